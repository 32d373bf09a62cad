//! Persistence of [`ProgressState`] snapshots.
//!
//! Storage is the single source of truth: handlers load a fresh snapshot
//! for every command and store the full new snapshot right after each
//! change. Concurrent writers race last-write-wins.

mod error;
mod file;
mod memory;
mod redis_backend;

use std::future::Future;

use crate::progress::ProgressState;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use redis_backend::{RedisConfig, RedisStorage};

/// Load/store access to the persisted progress.
///
/// This abstraction allows the bot to be tested with in-memory state.
pub trait StateStorage: Send + Sync {
    /// Load the current snapshot.
    ///
    /// Only a backend that has never stored anything may return the empty
    /// state; every other failure is an error.
    fn load(&self) -> impl Future<Output = Result<ProgressState, StorageError>> + Send;

    /// Replace the stored snapshot.
    fn store(&self, state: &ProgressState) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// The storage backend chosen at startup.
#[derive(Clone)]
pub enum AnyStorage {
    Memory(MemoryStorage),
    File(FileStorage),
    Redis(RedisStorage),
}

impl StateStorage for AnyStorage {
    async fn load(&self) -> Result<ProgressState, StorageError> {
        match self {
            AnyStorage::Memory(storage) => storage.load().await,
            AnyStorage::File(storage) => storage.load().await,
            AnyStorage::Redis(storage) => storage.load().await,
        }
    }

    async fn store(&self, state: &ProgressState) -> Result<(), StorageError> {
        match self {
            AnyStorage::Memory(storage) => storage.store(state).await,
            AnyStorage::File(storage) => storage.store(state).await,
            AnyStorage::Redis(storage) => storage.store(state).await,
        }
    }
}
