//! Command handlers.
//!
//! Each handler loads a fresh snapshot, applies at most one change,
//! stores the result and returns the reply to send. Storage errors
//! propagate so the caller never reports a change that wasn't saved.
//!
//! Changes hold a lock from load to store, so concurrently handled
//! commands never overwrite each other's visits.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Europe::Berlin;
use rand::Rng;
use rand::seq::IteratorRandom;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::Station;
use crate::progress::{MatchError, ProgressState, find_best_match};
use crate::storage::StateStorage;
use crate::telegram::Reply;

use super::command::Command;
use super::error::BotError;
use super::format::{format_date, format_link, format_station, format_suggestion};

pub const NO_QUERY: &str = "Du musst den Namen eines Bahnhofs oder Haltepunkts angeben.";
pub const NO_STATIONS: &str = "Keine Stationen geladen.";
pub const ALL_DONE: &str = "Alle Stationen wurden besucht. Glückwunsch!";

/// Handles commands against the stored progress.
#[derive(Debug, Clone)]
pub struct Handlers<S> {
    storage: S,
    write_lock: Arc<Mutex<()>>,
}

impl<S: StateStorage> Handlers<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Access the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Handle one command sent at `sent_at`.
    ///
    /// Returns `None` when the command warrants no answer.
    pub async fn handle(
        &self,
        command: Command,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<Reply>, BotError> {
        match command {
            Command::Done { query, from_photo } => {
                self.done(query.as_deref(), from_photo, sent_at).await
            }
            Command::Progress => self.progress().await.map(Some),
            Command::Station => self.station().await.map(Some),
        }
    }

    /// Mark the station best matching `query` as visited on the day
    /// (in German local time) the message was sent.
    pub async fn done(
        &self,
        query: Option<&str>,
        from_photo: bool,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<Reply>, BotError> {
        let Some(query) = query else {
            // Photos without a caption are just photos
            return Ok((!from_photo).then(|| Reply::plain(NO_QUERY)));
        };
        info!(query, "extracted query for done command");

        let _guard = self.write_lock.lock().await;
        let state = self.storage.load().await?;
        let station = match find_best_match(state.stations(), query) {
            Ok(station) => station.clone(),
            Err(MatchError::EmptyDirectory) => return Ok(Some(Reply::plain(NO_STATIONS))),
            Err(MatchError::NotFound {
                closest_match,
                score,
            }) => {
                warn!(query, %closest_match, score, "could not find station for query");
                return Ok(Some(Reply::html(format_suggestion(&closest_match)?)));
            }
        };

        let visited_on = sent_at.with_timezone(&Berlin).date_naive();
        let new_state = match state.mark_as_done(&station, visited_on) {
            Ok(new_state) => new_state,
            Err(already) => {
                return Ok(Some(Reply::plain(format!(
                    "Der {} {} wurde schon am {} besucht.",
                    station.station_type,
                    station.name,
                    format_date(already.date)
                ))));
            }
        };
        self.storage.store(&new_state).await?;
        info!(station = %station.name, %visited_on, "marked station as done");

        Ok(Some(Reply::plain(format!(
            "Der {} {} wurde als besucht markiert.",
            station.station_type, station.name
        ))))
    }

    /// Count of visited stations followed by the list of them.
    ///
    /// Long reports are split into several messages on sending.
    pub async fn progress(&self) -> Result<Reply, BotError> {
        let state = self.storage.load().await?;
        Ok(Reply::html(progress_report(&state)?).without_link_preview())
    }

    /// A random station that is still open.
    pub async fn station(&self) -> Result<Reply, BotError> {
        let state = self.storage.load().await?;
        Ok(suggest_station(&state, &mut rand::thread_rng())?)
    }
}

fn progress_report(state: &ProgressState) -> askama::Result<String> {
    let mut visited: Vec<(&Station, NaiveDate)> = state.visited_stations().collect();
    visited.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

    let lines = visited
        .into_iter()
        .map(|(station, date)| -> askama::Result<String> {
            let link = format_link(&station.name, station.name_link.as_deref())?;
            Ok(format!("{link} ({})", format_date(date)))
        })
        .collect::<askama::Result<Vec<String>>>()?;

    Ok(format!(
        "{} / {}\n\n{}",
        lines.len(),
        state.stations().len(),
        lines.join("\n")
    ))
}

fn suggest_station(state: &ProgressState, rng: &mut impl Rng) -> askama::Result<Reply> {
    if state.stations().is_empty() {
        return Ok(Reply::plain(NO_STATIONS));
    }

    let open = state.open_stations();
    debug!(
        total = state.stations().len(),
        open = open.clone().count(),
        "choosing an open station"
    );

    Ok(match open.choose(rng) {
        Some(station) => Reply::html(format_station(station)?).without_link_preview(),
        None => Reply::plain(ALL_DONE),
    })
}
