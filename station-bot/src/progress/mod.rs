//! Visit progress: directory reconciliation, fuzzy lookup and visit state.
//!
//! Everything in here is pure. Loading and storing snapshots is the job
//! of [`crate::storage`].

mod matching;
mod merge;
mod state;

pub use matching::{MATCH_THRESHOLD, MatchError, find_best_match};
pub use merge::update_stations;
pub use state::{AlreadyDone, ProgressState};
