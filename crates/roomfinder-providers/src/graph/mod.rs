//! Microsoft Graph calendar implementation.
//!
//! [`GraphClient`] implements [`CalendarApi`](crate::CalendarApi) over the
//! Graph v1.0 REST endpoints:
//!
//! - `GET /me/calendars` for the calendars the user can see
//! - `GET /me/calendars/{id}/calendarView` for busy intervals
//! - `POST /me/events` to book a room
//! - `POST /me/calendar/getSchedule` for a room's free/busy summary
//!
//! Every request carries the caller's bearer token and asks for UTC times.
//!
//! # Example
//!
//! ```ignore
//! use roomfinder_providers::graph::{GraphClient, GraphConfig};
//! use roomfinder_providers::{AccessToken, CalendarApi};
//!
//! let client = GraphClient::new(GraphConfig::default())?;
//! let calendars = client.list_calendars(&AccessToken::new(token)).await?;
//! ```

mod client;
mod config;
mod model;

pub use client::{AVAILABILITY_VIEW_INTERVAL, GraphClient};
pub use config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, GraphConfig};
