//! Core types: time windows, room calendars, tracing setup

pub mod room;
pub mod time;
pub mod tracing;

pub use room::{CandidateSet, RoomCalendar};
pub use time::{Interval, TimeError, TimeWindow, parse_clock, parse_date, parse_duration};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
