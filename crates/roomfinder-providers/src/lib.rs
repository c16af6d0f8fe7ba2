//! CalendarApi trait and implementations.
//!
//! This crate is the boundary between room finding and the remote calendar
//! service:
//!
//! - [`CalendarApi`] - The trait every calendar backend implements
//! - [`AccessToken`], [`BookingRequest`], [`ScheduleSummary`] - Request and
//!   response types shared with callers
//! - [`ProviderError`] - Classified transport/API errors
//! - [`graph::GraphClient`] - Microsoft Graph backend (feature `graph`)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Microsoft Graph     │
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  GraphClient         │
//! └──────────┬───────────┘
//!            │  CalendarApi
//!            ▼
//! ┌──────────────────────┐
//! │  resolver / booking  │
//! └──────────────────────┘
//! ```

pub mod api;
pub mod error;
#[cfg(feature = "graph")]
pub mod graph;

// Re-export main types at crate root
pub use api::{
    AccessToken, BookingRequest, BoxFuture, CalendarApi, DEFAULT_BODY, DEFAULT_SUBJECT,
    ScheduleSummary,
};
pub use error::{ErrorClass, ProviderError, ProviderErrorCode, ProviderResult};
