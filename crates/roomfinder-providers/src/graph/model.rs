//! Wire types for the Microsoft Graph calendar endpoints.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use roomfinder_core::{Interval, RoomCalendar, TimeWindow};

use crate::api::{BookingRequest, ScheduleSummary};
use crate::error::{ProviderError, ProviderErrorCode};

/// Graph answers either with data or with an `error` object, sometimes
/// under a 2xx status.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GraphReply<T> {
    Error { error: GraphErrorBody },
    Data(T),
}

/// Error object returned by Graph.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl GraphErrorBody {
    pub fn into_provider_error(self, code: ProviderErrorCode, fallback: &str) -> ProviderError {
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        let mut error = ProviderError::new(code, message).with_provider("graph");
        if let Some(api_code) = self.code {
            error = error.with_api_code(api_code);
        }
        error
    }
}

/// One page of a Graph collection.
#[derive(Debug, Deserialize)]
pub(crate) struct CollectionPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEmailAddress {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// A calendar from `/me/calendars`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCalendar {
    pub id: String,
    pub owner: Option<ApiEmailAddress>,
}

impl ApiCalendar {
    /// Calendars without a complete owner cannot be matched or booked.
    pub fn into_room_calendar(self) -> Option<RoomCalendar> {
        let owner = self.owner?;
        let name = owner.name.filter(|n| !n.is_empty())?;
        let address = owner.address.filter(|a| !a.is_empty())?;
        Some(RoomCalendar::new(self.id, name, address))
    }
}

/// `dateTimeTimeZone` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiDateTime {
    pub date_time: String,
    pub time_zone: Option<String>,
}

impl ApiDateTime {
    pub fn utc(dt: DateTime<Utc>) -> Self {
        Self {
            date_time: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: Some("UTC".to_string()),
        }
    }

    /// Parses the timestamp as UTC.
    ///
    /// Requests ask for UTC via the `Prefer` header, so a zone other than
    /// UTC is logged and the wall-clock value is still read as UTC.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if let Some(zone) = self.time_zone.as_deref() {
            if !zone.eq_ignore_ascii_case("UTC") {
                warn!("graph returned time zone {} instead of UTC", zone);
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date_time) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.date_time, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// An event from `calendarView`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEvent {
    pub id: Option<String>,
    pub start: Option<ApiDateTime>,
    pub end: Option<ApiDateTime>,
    #[serde(default)]
    pub is_cancelled: bool,
}

impl ApiEvent {
    /// Converts to a busy interval.
    ///
    /// The service only returns events overlapping the query window, so an
    /// event with unreadable times still blocks the whole window rather
    /// than being dropped.
    pub fn busy_interval(&self, window: &TimeWindow) -> Interval {
        let start = self.start.as_ref().and_then(ApiDateTime::to_utc);
        let end = self.end.as_ref().and_then(ApiDateTime::to_utc);
        match (start, end) {
            (Some(start), Some(end)) => Interval::new(start, end),
            _ => {
                warn!(
                    "event {} has unreadable times, treating the whole window as busy",
                    self.id.as_deref().unwrap_or("<unknown>")
                );
                Interval::new(window.start(), window.end())
            }
        }
    }
}

/// Body of `POST /me/events`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewEvent {
    pub subject: String,
    pub body: ItemBody,
    pub start: ApiDateTime,
    pub end: ApiDateTime,
    pub location: Location,
    pub attendees: Vec<NewAttendee>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemBody {
    pub content_type: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Location {
    pub display_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewAttendee {
    pub email_address: AttendeeAddress,
    #[serde(rename = "type")]
    pub attendee_type: &'static str,
    pub status: AttendeeStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendeeAddress {
    pub address: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendeeStatus {
    pub response: &'static str,
    pub time: String,
}

impl From<&BookingRequest> for NewEvent {
    fn from(request: &BookingRequest) -> Self {
        let start = request.window.start();
        Self {
            subject: request.subject.clone(),
            body: ItemBody {
                content_type: "text",
                content: request.body.clone(),
            },
            start: ApiDateTime::utc(start),
            end: ApiDateTime::utc(request.window.end()),
            location: Location {
                display_name: request.owner_name.clone(),
            },
            attendees: vec![NewAttendee {
                email_address: AttendeeAddress {
                    address: request.owner_address.clone(),
                    name: request.owner_name.clone(),
                },
                attendee_type: "required",
                status: AttendeeStatus {
                    response: "notResponded",
                    time: start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                },
            }],
        }
    }
}

/// Body of `POST /me/calendar/getSchedule`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScheduleQuery {
    pub schedules: Vec<String>,
    pub start_time: ApiDateTime,
    pub end_time: ApiDateTime,
    pub availability_view_interval: u32,
}

impl ScheduleQuery {
    pub fn new(address: &str, window: &TimeWindow, interval_minutes: u32) -> Self {
        Self {
            schedules: vec![address.to_string()],
            start_time: ApiDateTime::utc(window.start()),
            end_time: ApiDateTime::utc(window.end()),
            availability_view_interval: interval_minutes,
        }
    }
}

/// `scheduleInformation` resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiScheduleInformation {
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub schedule_items: Vec<ApiScheduleItem>,
    pub error: Option<ApiFreeBusyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiScheduleItem {
    pub status: Option<String>,
    pub start: Option<ApiDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiFreeBusyError {
    pub message: Option<String>,
    pub response_code: Option<String>,
}

impl ApiScheduleInformation {
    /// Summarizes the schedule of `address`.
    ///
    /// Items explicitly marked free are not meetings.
    pub fn into_summary(self, address: &str) -> Result<ScheduleSummary, ProviderError> {
        if let Some(error) = self.error {
            let body = GraphErrorBody {
                code: error.response_code,
                message: error.message,
            };
            return Err(body.into_provider_error(
                ProviderErrorCode::ServerError,
                "schedule lookup failed",
            ));
        }

        let meetings: Vec<&ApiScheduleItem> = self
            .schedule_items
            .iter()
            .filter(|item| !matches!(item.status.as_deref(), Some("free")))
            .collect();

        let first_busy_start = meetings
            .iter()
            .filter_map(|item| item.start.as_ref().and_then(ApiDateTime::to_utc))
            .min();

        Ok(ScheduleSummary {
            room_address: self.schedule_id.unwrap_or_else(|| address.to_string()),
            busy_count: meetings.len(),
            first_busy_start,
        })
    }
}
