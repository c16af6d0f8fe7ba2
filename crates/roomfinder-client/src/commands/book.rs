//! `roomfinder book`: book a known room directly.

use chrono::Utc;

use roomfinder_core::TimeWindow;
use roomfinder_engine::{BookingCommitter, BookingResult};

use super::{Session, meeting_window};
use crate::cli::BookArgs;
use crate::error::{ClientError, ClientResult};

pub async fn run(session: &Session, args: BookArgs) -> ClientResult<()> {
    let window = meeting_window(&args.when, &args.duration, &session.timezone, Utc::now())?;

    let committer =
        BookingCommitter::with_template(session.api.clone(), session.config.booking_template());
    let result = committer
        .book(&session.token, &args.room_address, &args.room_name, window)
        .await;

    report(session, result, &args.room_name, window)
}

/// Prints a successful booking or turns a failed one into an error.
pub fn report(
    session: &Session,
    result: BookingResult,
    room_name: &str,
    window: TimeWindow,
) -> ClientResult<()> {
    match result {
        BookingResult::Booked => {
            println!(
                "Booked {} from {} to {}",
                room_name,
                session.local(window.start()),
                session.local(window.end())
            );
            Ok(())
        }
        BookingResult::BookingFailed { error } => Err(ClientError::Booking(error)),
    }
}
