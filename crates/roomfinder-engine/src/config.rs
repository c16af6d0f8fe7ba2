//! Engine configuration.

use std::time::Duration;

use roomfinder_core::TimeWindow;
use roomfinder_providers::{BookingRequest, DEFAULT_BODY, DEFAULT_SUBJECT};

/// Default bound on a single availability check.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(8);

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// How long one calendar may take to answer before its check counts
    /// as failed.
    pub check_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            check_timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the per-check timeout.
    ///
    /// A zero bound would fail every check before it starts, so it keeps
    /// [`DEFAULT_CHECK_TIMEOUT`] instead.
    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = if timeout.is_zero() {
            DEFAULT_CHECK_TIMEOUT
        } else {
            timeout
        };
        self
    }
}

/// Subject and body used for booking events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTemplate {
    pub subject: String,
    pub body: String,
}

impl Default for BookingTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

impl BookingTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the event subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Builder: set the event body text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Fills the template for one room and window.
    pub fn request(&self, owner_address: &str, owner_name: &str, window: TimeWindow) -> BookingRequest {
        BookingRequest::new(owner_address, owner_name, window)
            .with_subject(self.subject.clone())
            .with_body(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn resolver_defaults() {
        assert_eq!(ResolverConfig::default().check_timeout, Duration::from_secs(8));
        let config = ResolverConfig::new().with_check_timeout(Duration::from_secs(2));
        assert_eq!(config.check_timeout, Duration::from_secs(2));
    }

    #[test]
    fn zero_check_timeout_keeps_default() {
        let config = ResolverConfig::new()
            .with_check_timeout(Duration::from_secs(2))
            .with_check_timeout(Duration::ZERO);
        assert_eq!(config.check_timeout, DEFAULT_CHECK_TIMEOUT);
    }

    #[test]
    fn template_fills_request() {
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 2, 5, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 5, 9, 30, 0).unwrap(),
        )
        .unwrap();

        let request = BookingTemplate::new()
            .with_subject("Standup")
            .request("rooma@x.com", "Room A", window);
        assert_eq!(request.subject, "Standup");
        assert_eq!(request.body, DEFAULT_BODY);
        assert_eq!(request.owner_address, "rooma@x.com");
        assert_eq!(request.window, window);
    }
}
