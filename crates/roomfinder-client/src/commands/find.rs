//! `roomfinder find`: look for a free room and optionally book it.

use chrono::Utc;
use tracing::debug;

use roomfinder_core::CandidateSet;
use roomfinder_engine::{AvailabilityResolver, BookingCommitter, ResolutionResult};

use super::{Session, book, meeting_window};
use crate::cli::FindArgs;
use crate::error::{ClientError, ClientResult};

pub async fn run(session: &Session, args: FindArgs) -> ClientResult<()> {
    let window = meeting_window(&args.when, &args.duration, &session.timezone, Utc::now())?;
    let candidates = if args.rooms.is_empty() {
        session.config.candidates()
    } else {
        CandidateSet::new(args.rooms)
    };
    debug!(
        "looking for one of {} rooms from {} to {}",
        candidates.len(),
        window.start(),
        window.end()
    );

    let resolver =
        AvailabilityResolver::with_config(session.api.clone(), session.config.resolver_config());
    let result = resolver.find(&session.token, window, &candidates).await;

    match result {
        ResolutionResult::RoomFound {
            owner_name,
            owner_address,
        } => {
            println!(
                "{} is available from {} to {}",
                owner_name,
                session.local(window.start()),
                session.local(window.end())
            );
            if args.book {
                let committer = BookingCommitter::with_template(
                    session.api.clone(),
                    session.config.booking_template(),
                );
                let booked = committer
                    .book(&session.token, &owner_address, &owner_name, window)
                    .await;
                book::report(session, booked, &owner_name, window)?;
            }
            Ok(())
        }
        ResolutionResult::NoRoomFree => {
            println!("{}", ResolutionResult::NoRoomFree);
            Ok(())
        }
        ResolutionResult::ResolutionFailed { error } => Err(ClientError::Resolution(error)),
    }
}
