//! Microsoft Graph calendar client.
//!
//! Low-level HTTP access to the calendar endpoints: authentication headers,
//! pagination, and mapping of statuses and error bodies onto
//! [`ProviderError`].

use chrono::SecondsFormat;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use roomfinder_core::{Interval, RoomCalendar, TimeWindow};

use super::config::GraphConfig;
use super::model::{
    ApiCalendar, ApiEvent, ApiScheduleInformation, CollectionPage, GraphErrorBody, GraphReply,
    NewEvent, ScheduleQuery,
};
use crate::api::{AccessToken, BookingRequest, BoxFuture, CalendarApi, ScheduleSummary};
use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};

const PROVIDER: &str = "graph";

/// Asks Graph to express every date/time in UTC.
const UTC_PREFERENCE: &str = "outlook.timezone=\"UTC\"";

/// Granularity of the free/busy view requested from `getSchedule`.
pub const AVAILABILITY_VIEW_INTERVAL: u32 = 15;

/// Upper bound on followed `@odata.nextLink` pages.
const MAX_PAGES: usize = 50;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: GraphErrorBody,
}

/// Microsoft Graph calendar client.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http_client: reqwest::Client,
    config: GraphConfig,
}

impl GraphClient {
    /// Creates a client after validating `config`.
    pub fn new(config: GraphConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::configuration(e).with_provider(PROVIDER))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::configuration("failed to create HTTP client")
                    .with_provider(PROVIDER)
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Sends one authenticated request and returns the body of a 2xx answer.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        token: &AccessToken,
    ) -> ProviderResult<String> {
        if token.is_empty() {
            return Err(ProviderError::authentication("access token is empty").with_provider(PROVIDER));
        }

        let response = request
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .header("Prefer", UTC_PREFERENCE)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());

        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status, retry_after, &body))
        }
    }

    /// Fetches every page of a collection starting at `first`.
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        first: url::Url,
    ) -> ProviderResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first.to_string());
        let mut pages = 0;

        while let Some(link) = next.take() {
            if pages == MAX_PAGES {
                warn!("stopping after {} pages of {}", MAX_PAGES, first.path());
                break;
            }
            pages += 1;

            let body = self.send(self.http_client.get(&link), token).await?;
            let page: CollectionPage<T> = parse_body(&body)?;
            items.extend(page.value);
            next = page.next_link;
        }

        Ok(items)
    }
}

impl CalendarApi for GraphClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn list_calendars<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, ProviderResult<Vec<RoomCalendar>>> {
        Box::pin(async move {
            let url = url::Url::parse_with_params(
                &self.url("/me/calendars"),
                &[("$select", "id,name,owner")],
            )
            .map_err(|e| invalid_url(e, "/me/calendars"))?;

            let calendars: Vec<ApiCalendar> = self.collect_pages(token, url).await?;
            let total = calendars.len();
            let rooms: Vec<RoomCalendar> = calendars
                .into_iter()
                .filter_map(ApiCalendar::into_room_calendar)
                .collect();

            debug!(
                "fetched {} calendars ({} without owner skipped)",
                rooms.len(),
                total - rooms.len()
            );
            Ok(rooms)
        })
    }

    fn busy_intervals<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<Interval>>> {
        Box::pin(async move {
            let path = format!(
                "/me/calendars/{}/calendarView",
                urlencoding::encode(calendar_id)
            );
            let url = url::Url::parse_with_params(
                &self.url(&path),
                &[
                    (
                        "startDateTime",
                        window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
                    ),
                    (
                        "endDateTime",
                        window.end().to_rfc3339_opts(SecondsFormat::Secs, true),
                    ),
                ],
            )
            .map_err(|e| invalid_url(e, &path))?;

            let events: Vec<ApiEvent> = self.collect_pages(token, url).await?;
            // Back-to-back meetings touching the window edges leave the room free.
            let busy: Vec<Interval> = events
                .iter()
                .filter(|event| !event.is_cancelled)
                .map(|event| event.busy_interval(&window))
                .filter(|interval| window.overlaps(interval))
                .collect();

            debug!(
                "calendar {} has {} busy intervals in window",
                calendar_id,
                busy.len()
            );
            Ok(busy)
        })
    }

    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        request: &'a BookingRequest,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            let payload = NewEvent::from(request);
            let builder = self.http_client.post(self.url("/me/events")).json(&payload);
            let body = self.send(builder, token).await?;

            if !body.trim().is_empty() {
                let _: IgnoredAny = parse_body(&body)?;
            }

            debug!("created event in {}", request.owner_address);
            Ok(())
        })
    }

    fn get_schedule<'a>(
        &'a self,
        token: &'a AccessToken,
        address: &'a str,
        window: TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<ScheduleSummary>> {
        Box::pin(async move {
            let query = ScheduleQuery::new(address, &window, AVAILABILITY_VIEW_INTERVAL);
            let builder = self
                .http_client
                .post(self.url("/me/calendar/getSchedule"))
                .json(&query);
            let body = self.send(builder, token).await?;

            let page: CollectionPage<ApiScheduleInformation> = parse_body(&body)?;
            let info = page.value.into_iter().next().ok_or_else(|| {
                ProviderError::invalid_response(format!("no schedule returned for {}", address))
                    .with_provider(PROVIDER)
            })?;

            info.into_summary(address)
        })
    }
}

/// Parses a 2xx body, treating an `error` object as an API error.
fn parse_body<T: DeserializeOwned>(body: &str) -> ProviderResult<T> {
    let reply: GraphReply<T> = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e))
            .with_provider(PROVIDER)
            .with_source(e)
    })?;

    match reply {
        GraphReply::Data(data) => Ok(data),
        GraphReply::Error { error } => {
            let code = code_for_api_error(error.code.as_deref());
            Err(error.into_provider_error(code, "graph returned an error"))
        }
    }
}

/// Picks an error code for an error object that arrived under a 2xx status.
fn code_for_api_error(api_code: Option<&str>) -> ProviderErrorCode {
    let Some(api_code) = api_code else {
        return ProviderErrorCode::ServerError;
    };
    if api_code.contains("Authentication") || api_code.contains("Unauthenticated") {
        ProviderErrorCode::AuthenticationFailed
    } else if api_code.contains("AccessDenied") || api_code.contains("Authorization") {
        ProviderErrorCode::AuthorizationFailed
    } else if api_code.contains("NotFound") {
        ProviderErrorCode::NotFound
    } else if api_code.contains("Throttl") {
        ProviderErrorCode::RateLimited
    } else {
        ProviderErrorCode::ServerError
    }
}

fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> ProviderError {
    let error = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let code = match status {
        StatusCode::UNAUTHORIZED => ProviderErrorCode::AuthenticationFailed,
        StatusCode::FORBIDDEN => ProviderErrorCode::AuthorizationFailed,
        StatusCode::NOT_FOUND => ProviderErrorCode::NotFound,
        StatusCode::BAD_REQUEST => ProviderErrorCode::BadRequest,
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorCode::RateLimited,
        _ => ProviderErrorCode::ServerError,
    };

    let fallback = match (code, retry_after) {
        (ProviderErrorCode::RateLimited, Some(secs)) => {
            format!("rate limit exceeded, retry after {} seconds", secs)
        }
        _ => format!("HTTP {}", status),
    };

    warn!("graph request failed with HTTP {}", status.as_u16());
    error.into_provider_error(code, &fallback)
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    let error = if e.is_timeout() {
        ProviderError::timeout("request timed out")
    } else if e.is_connect() {
        ProviderError::network(format!("connection failed: {}", e))
    } else if e.is_decode() || e.is_body() {
        ProviderError::invalid_response(format!("failed to read response: {}", e))
    } else {
        ProviderError::network(format!("request failed: {}", e))
    };
    error.with_provider(PROVIDER).with_source(e)
}

fn invalid_url(e: url::ParseError, path: &str) -> ProviderError {
    ProviderError::configuration(format!("invalid request URL for {}: {}", path, e))
        .with_provider(PROVIDER)
        .with_source(e)
}
