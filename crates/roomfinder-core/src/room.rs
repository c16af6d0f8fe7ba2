//! Room calendars and the candidate set a resolution may pick from.

use serde::{Deserialize, Serialize};

/// A bookable room calendar.
///
/// Rooms are modelled as calendars owned by the room's mailbox; the owner
/// name is the room's display name and the owner address is what gets
/// invited when the room is booked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCalendar {
    /// Opaque calendar identifier used in API paths.
    pub id: String,
    /// Display name of the calendar owner (the room name).
    pub owner_name: String,
    /// Email-like address of the calendar owner.
    pub owner_address: String,
}

impl RoomCalendar {
    pub fn new(
        id: impl Into<String>,
        owner_name: impl Into<String>,
        owner_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_name: owner_name.into(),
            owner_address: owner_address.into(),
        }
    }
}

/// Ordered list of room display names eligible for selection.
///
/// Matching is exact on the calendar owner name. The order is kept for
/// display only: resolution does not prefer earlier names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet(Vec<String>);

impl CandidateSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Returns true if `owner_name` is one of the candidates.
    pub fn contains(&self, owner_name: &str) -> bool {
        self.0.iter().any(|name| name == owner_name)
    }

    /// Returns true if the calendar's owner is one of the candidates.
    pub fn admits(&self, calendar: &RoomCalendar) -> bool {
        self.contains(&calendar.owner_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for CandidateSet {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
