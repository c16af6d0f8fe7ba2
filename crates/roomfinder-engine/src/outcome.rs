//! Results produced by the resolver and the booking committer.

use std::fmt;

use roomfinder_core::{Interval, RoomCalendar};
use roomfinder_providers::ProviderError;

/// Result of one availability check.
#[derive(Debug)]
pub enum AvailabilityOutcome {
    /// The calendar has nothing booked in the window.
    Free { calendar: RoomCalendar },
    /// The calendar has at least one busy interval in the window.
    Busy {
        calendar: RoomCalendar,
        busy: Vec<Interval>,
    },
    /// The lookup failed or timed out.
    Failed {
        calendar: RoomCalendar,
        error: ProviderError,
    },
}

impl AvailabilityOutcome {
    pub fn calendar(&self) -> &RoomCalendar {
        match self {
            Self::Free { calendar } | Self::Busy { calendar, .. } | Self::Failed { calendar, .. } => {
                calendar
            }
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free { .. })
    }
}

/// Terminal value of one resolution.
#[derive(Debug)]
pub enum ResolutionResult {
    RoomFound {
        owner_name: String,
        owner_address: String,
    },
    /// Every candidate was filtered out, busy, or failed without all of
    /// them failing.
    NoRoomFree,
    /// Every dispatched check failed; carries the last error seen.
    ResolutionFailed { error: ProviderError },
}

impl ResolutionResult {
    pub fn found(calendar: &RoomCalendar) -> Self {
        Self::RoomFound {
            owner_name: calendar.owner_name.clone(),
            owner_address: calendar.owner_address.clone(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::RoomFound { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::ResolutionFailed { .. })
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomFound { owner_name, .. } => write!(f, "{} is available", owner_name),
            Self::NoRoomFree => f.write_str("No rooms are available at this time"),
            Self::ResolutionFailed { error } => {
                write!(f, "Could not check room availability: {}", error)
            }
        }
    }
}

/// Result of one booking attempt.
#[derive(Debug)]
pub enum BookingResult {
    Booked,
    BookingFailed { error: ProviderError },
}

impl BookingResult {
    pub fn is_booked(&self) -> bool {
        matches!(self, Self::Booked)
    }
}
