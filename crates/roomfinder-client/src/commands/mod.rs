//! Command implementations.

pub mod book;
pub mod calendars;
pub mod config;
pub mod find;
pub mod schedule;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use roomfinder_core::{TimeWindow, parse_clock, parse_date, parse_duration};
use roomfinder_providers::AccessToken;
use roomfinder_providers::graph::GraphClient;

use crate::cli::WhenArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Everything a remote command needs.
pub struct Session {
    pub config: ClientConfig,
    pub api: Arc<GraphClient>,
    pub token: AccessToken,
    pub timezone: Tz,
}

impl Session {
    /// Validates the configuration, then builds the Graph client and
    /// resolves the token and timezone.
    pub fn open(
        config: ClientConfig,
        token_override: Option<&str>,
        timezone_override: Option<&str>,
    ) -> ClientResult<Self> {
        config.validate().map_err(ClientError::Config)?;

        let timezone = match timezone_override {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ClientError::Config(format!("unknown timezone '{}'", name)))?,
            None => config.timezone().map_err(ClientError::Config)?,
        };
        let token = config
            .access_token(token_override)
            .map_err(ClientError::Secret)?;
        let api = Arc::new(GraphClient::new(config.graph_config())?);

        Ok(Self {
            config,
            api,
            token,
            timezone,
        })
    }

    /// Local wall-clock rendering of an instant.
    pub fn local(&self, instant: DateTime<Utc>) -> String {
        format_local(instant, &self.timezone)
    }
}

/// Builds the meeting window.
///
/// With neither date nor start the meeting starts at `now`. A start without
/// a date is read on today's local date.
pub fn meeting_window(
    when: &WhenArgs,
    duration: &str,
    tz: &Tz,
    now: DateTime<Utc>,
) -> ClientResult<TimeWindow> {
    let duration = parse_duration(duration)?;

    match (when.date.as_deref(), when.start.as_deref()) {
        (None, None) => Ok(TimeWindow::from_duration(now, duration)?),
        (Some(_), None) => Err(ClientError::Config(
            "--start is required when --date is given".to_string(),
        )),
        (date, Some(start)) => {
            let date = match date {
                Some(date) => parse_date(date)?,
                None => now.with_timezone(tz).date_naive(),
            };
            let clock = parse_clock(start)?;
            Ok(TimeWindow::from_local(date, clock, duration, tz)?)
        }
    }
}

/// Builds the window for a schedule check: the whole local day unless a
/// start or a duration narrows it.
pub fn schedule_window(
    when: &WhenArgs,
    duration: Option<&str>,
    tz: &Tz,
    now: DateTime<Utc>,
) -> ClientResult<TimeWindow> {
    match (duration, when.start.as_deref()) {
        (Some(duration), _) => meeting_window(when, duration, tz, now),
        (None, Some(_)) => Err(ClientError::Config(
            "--duration is required when --start is given".to_string(),
        )),
        (None, None) => {
            let date = match when.date.as_deref() {
                Some(date) => parse_date(date)?,
                None => now.with_timezone(tz).date_naive(),
            };
            Ok(TimeWindow::for_date(date, tz)?)
        }
    }
}

pub fn format_local(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}
