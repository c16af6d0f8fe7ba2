//! Scriptable in-memory calendar for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};

use roomfinder_core::{Interval, RoomCalendar, TimeWindow};
use roomfinder_providers::{
    AccessToken, BookingRequest, BoxFuture, CalendarApi, ProviderError, ProviderErrorCode,
    ProviderResult, ScheduleSummary,
};

/// Scripted answer for one calendar.
#[derive(Debug, Clone)]
pub enum Reply {
    Free,
    Busy(Vec<Interval>),
    Fail(ProviderErrorCode),
}

#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    reply: Reply,
}

#[derive(Default)]
pub struct FakeCalendar {
    calendars: Vec<RoomCalendar>,
    scripts: HashMap<String, Script>,
    create_failure: Option<ProviderErrorCode>,
    schedule: Option<ScheduleSummary>,
    availability_calls: AtomicUsize,
    completed: Mutex<Vec<String>>,
    created: Mutex<Vec<BookingRequest>>,
    schedule_calls: AtomicUsize,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a calendar that answers `reply` after `delay`.
    pub fn with_room(mut self, name: &str, delay: Duration, reply: Reply) -> Self {
        let id = format!("cal-{}", name.replace(' ', "-"));
        let address = format!("{}@x.com", name.to_lowercase().replace(' ', ""));
        self.calendars
            .push(RoomCalendar::new(id.clone(), name, address));
        self.scripts.insert(id, Script { delay, reply });
        self
    }

    pub fn with_create_failure(mut self, code: ProviderErrorCode) -> Self {
        self.create_failure = Some(code);
        self
    }

    pub fn with_schedule(mut self, summary: ScheduleSummary) -> Self {
        self.schedule = Some(summary);
        self
    }

    pub fn calendars(&self) -> Vec<RoomCalendar> {
        self.calendars.clone()
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    /// Calendar ids whose lookup ran to completion.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<BookingRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }
}

fn scripted_error(code: ProviderErrorCode) -> ProviderError {
    ProviderError::new(code, format!("scripted {}", code)).with_provider("fake")
}

impl CalendarApi for FakeCalendar {
    fn name(&self) -> &str {
        "fake"
    }

    fn list_calendars<'a>(
        &'a self,
        _token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<RoomCalendar>>> {
        Box::pin(async move { Ok(self.calendars.clone()) })
    }

    fn busy_intervals<'a>(
        &'a self,
        _token: &'a AccessToken,
        calendar_id: &'a str,
        _window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Interval>>> {
        Box::pin(async move {
            self.availability_calls.fetch_add(1, Ordering::SeqCst);
            let script = self
                .scripts
                .get(calendar_id)
                .cloned()
                .ok_or_else(|| ProviderError::not_found(calendar_id.to_string()))?;

            tokio::time::sleep(script.delay).await;
            self.completed.lock().unwrap().push(calendar_id.to_string());

            match script.reply {
                Reply::Free => Ok(Vec::new()),
                Reply::Busy(busy) => Ok(busy),
                Reply::Fail(code) => Err(scripted_error(code)),
            }
        })
    }

    fn create_event<'a>(
        &'a self,
        _token: &'a AccessToken,
        request: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            self.created.lock().unwrap().push(request.clone());
            match self.create_failure {
                Some(code) => Err(scripted_error(code)),
                None => Ok(()),
            }
        })
    }

    fn get_schedule<'a>(
        &'a self,
        _token: &'a AccessToken,
        address: &'a str,
        _window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<ScheduleSummary>> {
        Box::pin(async move {
            self.schedule_calls.fetch_add(1, Ordering::SeqCst);
            match &self.schedule {
                Some(summary) => Ok(summary.clone()),
                None => Err(ProviderError::server(format!("no mailbox for {}", address))
                    .with_api_code("ErrorMailboxNotFound")
                    .with_provider("fake")),
            }
        })
    }
}

pub fn token() -> AccessToken {
    AccessToken::new("test-token")
}

/// 2025-02-05 09:00 to 09:30 UTC.
pub fn window() -> TimeWindow {
    TimeWindow::new(at(9, 0), at(9, 30)).unwrap()
}

pub fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 5, hour, minute, 0).unwrap()
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
