//! Room finding on top of a [`CalendarApi`](roomfinder_providers::CalendarApi).
//!
//! - [`AvailabilityResolver`] - races availability checks and picks a free room
//! - [`BookingCommitter`] - creates the booking event for a chosen room
//! - [`summarize_schedule`] - meeting count and first meeting of one room
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use roomfinder_engine::{AvailabilityResolver, BookingCommitter, ResolutionResult};
//!
//! let api = Arc::new(GraphClient::new(GraphConfig::default())?);
//! let resolver = AvailabilityResolver::new(api.clone());
//!
//! if let ResolutionResult::RoomFound { owner_name, owner_address } =
//!     resolver.find(&token, window, &candidates).await
//! {
//!     BookingCommitter::new(api)
//!         .book(&token, &owner_address, &owner_name, window)
//!         .await;
//! }
//! ```

pub mod booking;
pub mod config;
pub mod outcome;
pub mod resolver;
pub mod schedule;

#[cfg(test)]
mod testing;

pub use booking::BookingCommitter;
pub use config::{BookingTemplate, DEFAULT_CHECK_TIMEOUT, ResolverConfig};
pub use outcome::{AvailabilityOutcome, BookingResult, ResolutionResult};
pub use resolver::{AvailabilityQuery, AvailabilityResolver, ResolveOnce};
pub use schedule::summarize_schedule;
