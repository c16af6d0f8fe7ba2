//! Availability resolution across candidate room calendars.
//!
//! A resolution races one availability check per eligible calendar:
//!
//! - calendars whose owner is not a candidate are unusable without a call
//! - the first calendar to report an empty busy set wins
//! - busy and failed calendars count towards completion; once every
//!   calendar is accounted for without a winner the room search is over
//!
//! The checks live in a [`FuturesUnordered`] polled by the caller's task, so
//! completions are observed in arrival order. When a winner is found the
//! set is dropped, which cancels the requests still in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::{debug, info, warn};

use roomfinder_core::{CandidateSet, RoomCalendar, TimeWindow};
use roomfinder_providers::{AccessToken, CalendarApi, ProviderError};

use crate::config::ResolverConfig;
use crate::outcome::{AvailabilityOutcome, ResolutionResult};

/// A cell that accepts its value once.
///
/// Later values are handed back to the caller untouched.
#[derive(Debug)]
pub struct ResolveOnce<T> {
    cell: OnceLock<T>,
}

impl<T> Default for ResolveOnce<T> {
    fn default() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }
}

impl<T> ResolveOnce<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` if nothing was stored yet, otherwise returns it.
    pub fn resolve(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.cell.into_inner()
    }
}

/// Completion bookkeeping for one resolution.
#[derive(Debug)]
struct ResolutionTally {
    total: usize,
    unusable: AtomicUsize,
    dispatched: AtomicUsize,
    failed: AtomicUsize,
}

impl ResolutionTally {
    fn new(total: usize) -> Self {
        Self {
            total,
            unusable: AtomicUsize::new(0),
            dispatched: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    fn dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
    }

    /// Counts one unusable calendar. Returns true for the increment that
    /// accounts for the last calendar.
    fn mark_unusable(&self) -> bool {
        self.unusable.fetch_add(1, Ordering::SeqCst) + 1 == self.total
    }

    fn mark_failed(&self) -> bool {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.mark_unusable()
    }

    /// Terminal value once every calendar is unusable.
    fn exhausted(&self, last_error: Option<ProviderError>) -> ResolutionResult {
        let dispatched = self.dispatched.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);

        match last_error {
            Some(error) if dispatched > 0 && failed == dispatched => {
                warn!(
                    "all {} availability checks failed, last error: {}",
                    dispatched, error
                );
                ResolutionResult::ResolutionFailed { error }
            }
            _ => {
                info!(
                    "no room free: {} calendars, {} checked, {} failed",
                    self.total, dispatched, failed
                );
                ResolutionResult::NoRoomFree
            }
        }
    }
}

/// One unit of concurrent work: is `calendar` free during `window`?
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityQuery<'a> {
    pub token: &'a AccessToken,
    pub window: TimeWindow,
    pub calendar: &'a RoomCalendar,
}

impl<'a> AvailabilityQuery<'a> {
    pub fn new(token: &'a AccessToken, window: TimeWindow, calendar: &'a RoomCalendar) -> Self {
        Self {
            token,
            window,
            calendar,
        }
    }

    /// Runs the lookup, bounded by `limit`.
    pub async fn run(self, api: &dyn CalendarApi, limit: Duration) -> AvailabilityOutcome {
        let calendar = self.calendar.clone();
        let lookup = api.busy_intervals(self.token, &self.calendar.id, self.window);

        match tokio::time::timeout(limit, lookup).await {
            Ok(Ok(busy)) if busy.is_empty() => AvailabilityOutcome::Free { calendar },
            Ok(Ok(busy)) => AvailabilityOutcome::Busy { calendar, busy },
            Ok(Err(error)) => AvailabilityOutcome::Failed { calendar, error },
            Err(_) => {
                let error = ProviderError::timeout(format!(
                    "availability check for {} exceeded {}s",
                    calendar.owner_name,
                    limit.as_secs_f64()
                ))
                .with_provider(api.name());
                AvailabilityOutcome::Failed { calendar, error }
            }
        }
    }
}

/// Finds a free room among candidate calendars.
#[derive(Clone)]
pub struct AvailabilityResolver {
    api: Arc<dyn CalendarApi>,
    config: ResolverConfig,
}

impl AvailabilityResolver {
    pub fn new(api: Arc<dyn CalendarApi>) -> Self {
        Self::with_config(api, ResolverConfig::default())
    }

    pub fn with_config(api: Arc<dyn CalendarApi>, config: ResolverConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Lists the user's calendars, then resolves among them.
    ///
    /// A failed listing is reported as [`ResolutionResult::ResolutionFailed`].
    pub async fn find(
        &self,
        token: &AccessToken,
        window: TimeWindow,
        candidates: &CandidateSet,
    ) -> ResolutionResult {
        match self.api.list_calendars(token).await {
            Ok(calendars) => self.resolve(token, window, candidates, &calendars).await,
            Err(error) => {
                warn!("failed to list calendars: {}", error);
                ResolutionResult::ResolutionFailed { error }
            }
        }
    }

    /// Resolves which calendar, if any, is free for `window`.
    ///
    /// Exactly one [`ResolutionResult`] comes out of each call. Which free
    /// room wins depends on response latency, not on list order.
    #[tracing::instrument(
        skip_all,
        fields(calendars = calendars.len(), candidates = candidates.len())
    )]
    pub async fn resolve(
        &self,
        token: &AccessToken,
        window: TimeWindow,
        candidates: &CandidateSet,
        calendars: &[RoomCalendar],
    ) -> ResolutionResult {
        if calendars.is_empty() {
            info!("no room free: no calendars to check");
            return ResolutionResult::NoRoomFree;
        }

        let tally = ResolutionTally::new(calendars.len());
        let result = ResolveOnce::new();
        let api = self.api.as_ref();
        let limit = self.config.check_timeout;

        let mut checks = FuturesUnordered::new();
        for calendar in calendars {
            if !candidates.admits(calendar) {
                debug!("skipping {}: not a candidate room", calendar.owner_name);
                if tally.mark_unusable() {
                    let _ = result.resolve(tally.exhausted(None));
                }
                continue;
            }

            debug!("dispatching availability check for {}", calendar.owner_name);
            tally.dispatch();
            checks.push(AvailabilityQuery::new(token, window, calendar).run(api, limit));
        }

        let mut last_error = None;
        while !result.is_resolved() {
            let Some(outcome) = checks.next().await else {
                break;
            };

            match outcome {
                AvailabilityOutcome::Free { calendar } => {
                    info!("{} is free", calendar.owner_name);
                    let _ = result.resolve(ResolutionResult::found(&calendar));
                }
                AvailabilityOutcome::Busy { calendar, busy } => {
                    debug!(
                        "{} is busy ({} intervals)",
                        calendar.owner_name,
                        busy.len()
                    );
                    if tally.mark_unusable() {
                        let _ = result.resolve(tally.exhausted(last_error.take()));
                    }
                }
                AvailabilityOutcome::Failed { calendar, error } => {
                    warn!("availability check for {} failed: {}", calendar.owner_name, error);
                    last_error = Some(error);
                    if tally.mark_failed() {
                        let _ = result.resolve(tally.exhausted(last_error.take()));
                    }
                }
            }
        }

        // Remaining checks are cancelled here.
        drop(checks);

        result
            .into_inner()
            .unwrap_or_else(|| tally.exhausted(last_error))
    }
}
