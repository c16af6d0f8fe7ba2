//! `roomfinder calendars`: list calendars and their owners.

use roomfinder_core::{CandidateSet, RoomCalendar};
use roomfinder_providers::CalendarApi;

use super::Session;
use crate::error::ClientResult;

pub async fn run(session: &Session) -> ClientResult<()> {
    let calendars = session.api.list_calendars(&session.token).await?;
    if calendars.is_empty() {
        println!("No calendars found.");
        return Ok(());
    }

    let candidates = session.config.candidates();
    for line in render(&calendars, &candidates) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per calendar; candidate rooms are starred.
fn render(calendars: &[RoomCalendar], candidates: &CandidateSet) -> Vec<String> {
    calendars
        .iter()
        .map(|calendar| {
            let marker = if candidates.admits(calendar) { '*' } else { ' ' };
            format!(
                "{} {} <{}>",
                marker, calendar.owner_name, calendar.owner_address
            )
        })
        .collect()
}
