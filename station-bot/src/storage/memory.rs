//! In-process state storage.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::progress::ProgressState;

use super::{StateStorage, StorageError};

/// Keeps the snapshot in memory. Progress is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<ProgressState>>,
}

impl MemoryStorage {
    /// Start from the given snapshot.
    pub fn new(initial: ProgressState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }
}

impl StateStorage for MemoryStorage {
    async fn load(&self) -> Result<ProgressState, StorageError> {
        Ok(self.state.read().await.clone())
    }

    async fn store(&self, state: &ProgressState) -> Result<(), StorageError> {
        *self.state.write().await = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Station, StationType};

    #[tokio::test]
    async fn starts_from_initial_state() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.load().await.unwrap(), ProgressState::empty());
    }

    #[tokio::test]
    async fn store_then_load() {
        let storage = MemoryStorage::default();
        let husum = Station::new("Husum", StationType::MajorStation, "NF").unwrap();
        let state = ProgressState::empty().update_stations(&[husum]);

        storage.store(&state).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let storage = MemoryStorage::default();
        let other = storage.clone();
        let husum = Station::new("Husum", StationType::MajorStation, "NF").unwrap();
        let state = ProgressState::empty().update_stations(&[husum]);

        other.store(&state).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), state);
    }
}
