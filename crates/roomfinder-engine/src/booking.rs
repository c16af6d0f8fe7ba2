//! Booking a room once it has been chosen.

use std::sync::Arc;

use tracing::{info, warn};

use roomfinder_core::TimeWindow;
use roomfinder_providers::{AccessToken, CalendarApi};

use crate::config::BookingTemplate;
use crate::outcome::BookingResult;

/// Submits booking events.
///
/// Each call to [`book`](Self::book) issues exactly one event creation and
/// never retries. Nothing guards against booking the same window twice.
#[derive(Clone)]
pub struct BookingCommitter {
    api: Arc<dyn CalendarApi>,
    template: BookingTemplate,
}

impl BookingCommitter {
    pub fn new(api: Arc<dyn CalendarApi>) -> Self {
        Self::with_template(api, BookingTemplate::default())
    }

    pub fn with_template(api: Arc<dyn CalendarApi>, template: BookingTemplate) -> Self {
        Self { api, template }
    }

    pub fn template(&self) -> &BookingTemplate {
        &self.template
    }

    /// Books the room `owner_name` <`owner_address`> for `window`.
    #[tracing::instrument(skip(self, token, owner_address, window))]
    pub async fn book(
        &self,
        token: &AccessToken,
        owner_address: &str,
        owner_name: &str,
        window: TimeWindow,
    ) -> BookingResult {
        let request = self.template.request(owner_address, owner_name, window);

        match self.api.create_event(token, &request).await {
            Ok(()) => {
                info!(
                    "booked {} from {} to {}",
                    owner_name,
                    window.start(),
                    window.end()
                );
                BookingResult::Booked
            }
            Err(error) => {
                warn!("booking {} failed: {}", owner_name, error);
                BookingResult::BookingFailed { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCalendar, token, window};
    use roomfinder_providers::{DEFAULT_SUBJECT, ProviderErrorCode};

    #[tokio::test]
    async fn booking_creates_one_event() {
        let fake = Arc::new(FakeCalendar::new());
        let committer = BookingCommitter::new(fake.clone());

        let result = committer
            .book(&token(), "rooma@x.com", "Room A", window())
            .await;
        assert!(result.is_booked());

        let created = fake.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].owner_address, "rooma@x.com");
        assert_eq!(created[0].owner_name, "Room A");
        assert_eq!(created[0].window, window());
        assert_eq!(created[0].subject, DEFAULT_SUBJECT);
    }

    #[tokio::test]
    async fn api_error_is_booking_failed() {
        let fake = Arc::new(FakeCalendar::new().with_create_failure(ProviderErrorCode::BadRequest));
        let committer = BookingCommitter::new(fake.clone());

        let result = committer
            .book(&token(), "roomA@x.com", "Room A", window())
            .await;
        match result {
            BookingResult::BookingFailed { error } => {
                assert_eq!(error.code(), ProviderErrorCode::BadRequest);
            }
            BookingResult::Booked => panic!("expected BookingFailed"),
        }
        assert_eq!(fake.created().len(), 1);
    }

    #[tokio::test]
    async fn booking_twice_creates_two_events() {
        let fake = Arc::new(FakeCalendar::new());
        let committer = BookingCommitter::with_template(
            fake.clone(),
            BookingTemplate::new().with_subject("Standup").with_body("Daily sync"),
        );

        for _ in 0..2 {
            let result = committer
                .book(&token(), "rooma@x.com", "Room A", window())
                .await;
            assert!(result.is_booked());
        }

        let created = fake.created();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|r| r.subject == "Standup" && r.body == "Daily sync"));
    }
}
