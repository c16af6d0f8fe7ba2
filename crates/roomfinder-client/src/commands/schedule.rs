//! `roomfinder schedule`: meeting count of one room.

use chrono::Utc;
use chrono_tz::Tz;

use roomfinder_core::TimeWindow;
use roomfinder_engine::summarize_schedule;
use roomfinder_providers::ScheduleSummary;

use super::{Session, format_local, schedule_window};
use crate::cli::ScheduleArgs;
use crate::error::ClientResult;

pub async fn run(session: &Session, args: ScheduleArgs) -> ClientResult<()> {
    let window = schedule_window(
        &args.when,
        args.duration.as_deref(),
        &session.timezone,
        Utc::now(),
    )?;

    let summary = summarize_schedule(
        session.api.as_ref(),
        &session.token,
        &args.room_address,
        window,
    )
    .await?;

    println!("{}", render(&summary, window, &session.timezone));
    Ok(())
}

fn render(summary: &ScheduleSummary, window: TimeWindow, tz: &Tz) -> String {
    let range = format!(
        "between {} and {}",
        format_local(window.start(), tz),
        format_local(window.end(), tz)
    );

    match (summary.busy_count, summary.first_busy_start) {
        (0, _) => format!("{} has no meetings {}", summary.room_address, range),
        (count, Some(first)) => format!(
            "{} has {} meeting{} {}, the first starts at {}",
            summary.room_address,
            count,
            if count == 1 { "" } else { "s" },
            range,
            format_local(first, tz)
        ),
        (count, None) => format!(
            "{} has {} meeting{} {}",
            summary.room_address,
            count,
            if count == 1 { "" } else { "s" },
            range
        ),
    }
}
