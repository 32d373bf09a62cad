//! Startup reconciliation of the stored directory with upstream.

use tracing::{info, warn};

use crate::directory::StationDirectory;
use crate::domain::Station;
use crate::progress::ProgressState;
use crate::storage::{StateStorage, StorageError};

/// Merge the current upstream stations into the stored state.
///
/// `imported` (hand-maintained stations) is applied first and the fetched
/// list second, so upstream wins once it knows a station. If the
/// directory is unavailable the stored state is kept as is.
pub async fn reconcile<S, D>(
    storage: &S,
    directory: &D,
    imported: &[Station],
) -> Result<ProgressState, StorageError>
where
    S: StateStorage,
    D: StationDirectory,
{
    info!("trying to update stations from the directory");
    let Some(fresh) = directory.fetch_stations().await else {
        warn!("could not retrieve stations, keeping stored directory");
        return storage.load().await;
    };

    let state = storage.load().await?;
    let before = state.stations().len();
    let state = state.update_stations(imported).update_stations(&fresh);
    storage.store(&state).await?;

    info!(
        before,
        after = state.stations().len(),
        fetched = fresh.len(),
        "reconciled stations"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationType;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Directory serving a fixed answer.
    struct FixedDirectory {
        stations: Option<Vec<Station>>,
        calls: AtomicUsize,
    }

    impl FixedDirectory {
        fn new(stations: Option<Vec<Station>>) -> Self {
            Self {
                stations,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl StationDirectory for FixedDirectory {
        async fn fetch_stations(&self) -> Option<Vec<Station>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.stations.clone()
        }
    }

    fn station(name: &str) -> Station {
        Station::new(name, StationType::MajorStation, "SH").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn first_run_stores_imported_then_fresh() {
        let storage = MemoryStorage::default();
        let directory = FixedDirectory::new(Some(vec![station("Husum"), station("Kiel")]));

        let state = reconcile(&storage, &directory, &[station("Moisling")])
            .await
            .unwrap();

        let names: Vec<_> = state.stations().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Moisling", "Husum", "Kiel"]);
        assert_eq!(storage.load().await.unwrap(), state);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keeps_visits_and_vanished_stations() {
        let initial = ProgressState::empty()
            .update_stations(&[station("Husum"), station("Gone")])
            .mark_as_done(&station("Husum"), date())
            .unwrap();
        let storage = MemoryStorage::new(initial);
        let mut husum = station("Husum");
        husum.tracks = Some(5);
        let directory = FixedDirectory::new(Some(vec![husum.clone()]));

        let state = reconcile(&storage, &directory, &[]).await.unwrap();

        assert_eq!(state.stations(), &[husum, station("Gone")]);
        assert_eq!(state.done_date("Husum"), Some(date()));
    }

    #[tokio::test]
    async fn scraped_version_replaces_imported() {
        let mut imported = station("Moisling").with_link("https://example.com/moisling");
        imported.notes = "manual".into();
        let mut scraped = station("Lübeck-Moisling").with_link("https://example.com/moisling");
        scraped.notes = "scraped".into();
        let storage = MemoryStorage::default();
        let directory = FixedDirectory::new(Some(vec![scraped.clone()]));

        let state = reconcile(&storage, &directory, &[imported]).await.unwrap();

        assert_eq!(state.stations(), &[scraped]);
    }

    #[tokio::test]
    async fn unavailable_directory_keeps_stored_state() {
        let initial = ProgressState::empty().update_stations(&[station("Husum")]);
        let storage = MemoryStorage::new(initial.clone());
        let directory = FixedDirectory::new(None);

        let state = reconcile(&storage, &directory, &[station("Moisling")])
            .await
            .unwrap();

        assert_eq!(state, initial);
        assert_eq!(storage.load().await.unwrap(), initial);
    }

    #[tokio::test]
    async fn repeated_reconciliation_is_stable() {
        let storage = MemoryStorage::default();
        let directory = FixedDirectory::new(Some(vec![station("Husum"), station("Kiel")]));
        let imported = [station("Moisling")];

        let first = reconcile(&storage, &directory, &imported).await.unwrap();
        let second = reconcile(&storage, &directory, &imported).await.unwrap();

        assert_eq!(first, second);
    }
}
