// leaderboard/mod.rs
//
// Leaderboard pipeline: normalize the two documents, merge, rank, size.
// The DOM side lives in shoal-web.

pub mod document;
pub mod icons;
pub mod layout;

pub use document::{GlobalSettings, LeaderboardDocument, LeaderboardEntry};
pub use icons::{placeholder_for_status, placeholder_for_tags, resolve_icon, IconEntry, IconMap, ResolvedIcon};
pub use layout::{LeaderboardView, ListRow, PodiumSlot, RankedEntry};

use crate::error::{DataFormatError, FetchError};

/// Icons are optional: any failure degrades to an empty map.
pub fn icons_or_empty(result: Result<String, FetchError>) -> IconMap {
    match result.and_then(|body| IconMap::from_json(&body).map_err(FetchError::from)) {
        Ok(map) => map,
        Err(err) => {
            log::warn!("icons unavailable, using fallbacks: {err}");
            IconMap::new()
        }
    }
}

/// The leaderboard itself is mandatory: any failure is returned to the caller.
pub fn leaderboard_from(result: Result<String, FetchError>) -> Result<LeaderboardDocument, FetchError> {
    let body = result?;
    LeaderboardDocument::from_json(&body).map_err(|err: DataFormatError| err.into())
}
