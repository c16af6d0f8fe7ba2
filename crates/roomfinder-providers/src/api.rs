//! CalendarApi trait definition.
//!
//! [`CalendarApi`] is the seam between the room-finding logic and a remote
//! calendar service. Every method is a single remote call (plus pagination
//! where the service pages its answers) with no retry.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use roomfinder_core::{Interval, RoomCalendar, TimeWindow};

use crate::error::ProviderResult;

/// Subject used for bookings unless the caller sets one.
pub const DEFAULT_SUBJECT: &str = "Room booking";

/// Body text used for bookings unless the caller sets one.
pub const DEFAULT_BODY: &str = "This meeting was booked by roomfinder.";

/// A bearer access token.
///
/// The token is shared read-only by every call made for one request.
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Everything needed to create one booking event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Address of the room being booked; invited as a required attendee.
    pub owner_address: String,
    /// Display name of the room.
    pub owner_name: String,
    pub window: TimeWindow,
    pub subject: String,
    pub body: String,
}

impl BookingRequest {
    pub fn new(
        owner_address: impl Into<String>,
        owner_name: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            owner_address: owner_address.into(),
            owner_name: owner_name.into(),
            window,
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Busy summary of one room over a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub room_address: String,
    /// Number of meetings overlapping the window.
    pub busy_count: usize,
    /// Start of the earliest meeting, if any.
    pub first_busy_start: Option<DateTime<Utc>>,
}

impl ScheduleSummary {
    pub fn free(room_address: impl Into<String>) -> Self {
        Self {
            room_address: room_address.into(),
            busy_count: 0,
            first_busy_start: None,
        }
    }

    pub fn has_meetings(&self) -> bool {
        self.busy_count > 0
    }
}

/// A boxed future, so that the trait stays object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote calendar operations used to find and book rooms.
///
/// Implementations must be `Send + Sync`: one instance is shared by every
/// concurrent availability check of a resolution.
pub trait CalendarApi: Send + Sync {
    /// Returns the provider tag (e.g. "graph").
    fn name(&self) -> &str;

    /// Lists the calendars visible to the token's user, with their owners.
    fn list_calendars<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<RoomCalendar>>>;

    /// Returns the busy intervals of one calendar within `window`.
    ///
    /// An empty result means the calendar is free for the whole window.
    fn busy_intervals<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Interval>>>;

    /// Creates one calendar event. Calling it twice creates two events.
    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        request: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Returns the free/busy summary of one address within `window`.
    fn get_schedule<'a>(
        &'a self,
        token: &'a AccessToken,
        address: &'a str,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<ScheduleSummary>>;
}
