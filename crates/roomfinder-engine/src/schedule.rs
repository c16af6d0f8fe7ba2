//! Single-room schedule summary.

use tracing::debug;

use roomfinder_core::TimeWindow;
use roomfinder_providers::{AccessToken, CalendarApi, ProviderResult, ScheduleSummary};

/// Reports whether `room_address` has meetings during `window`, and when
/// the first one starts.
///
/// One remote call, no retry.
pub async fn summarize_schedule(
    api: &dyn CalendarApi,
    token: &AccessToken,
    room_address: &str,
    window: TimeWindow,
) -> ProviderResult<ScheduleSummary> {
    let summary = api.get_schedule(token, room_address, window).await?;

    match summary.first_busy_start {
        Some(first) => debug!(
            "{} has {} meetings, first at {}",
            summary.room_address, summary.busy_count, first
        ),
        None => debug!("{} has no meetings", summary.room_address),
    }

    Ok(summary)
}
