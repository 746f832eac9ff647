//! In-memory snapshot repository for testing.
//!
//! This adapter provides a pure in-memory implementation of
//! SnapshotRepository, enabling fast tests without any file system I/O.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    Result,
    ports::SnapshotRepository,
    q_learning::{QSnapshot, SavedQLearner, SnapshotKey},
};

type Storage = HashMap<SnapshotKey, BTreeMap<u64, Vec<u8>>>;

/// In-memory repository for testing.
///
/// Snapshots are encoded exactly as on disk, so corrupt or mismatched data
/// surfaces the same errors as the file-backed store.
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<Storage>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, Storage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of snapshots stored across all keys.
    pub fn count(&self) -> usize {
        self.storage().values().map(BTreeMap::len).sum()
    }

    /// Clear all stored snapshots.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Store raw bytes under a key, bypassing encoding.
    pub fn insert_raw(&self, key: SnapshotKey, episodes: u64, bytes: Vec<u8>) {
        self.storage().entry(key).or_default().insert(episodes, bytes);
    }
}

impl SnapshotRepository for InMemoryRepository {
    fn save(&self, snapshot: &QSnapshot) -> Result<()> {
        let bytes = SavedQLearner::new(snapshot.clone()).to_bytes()?;
        self.insert_raw(snapshot.key(), snapshot.episodes, bytes);
        Ok(())
    }

    fn load_latest(&self, key: SnapshotKey) -> Result<Option<QSnapshot>> {
        let storage = self.storage();
        let Some((_, bytes)) = storage.get(&key).and_then(|by_episodes| by_episodes.last_key_value())
        else {
            return Ok(None);
        };

        SavedQLearner::from_bytes(bytes)?.into_snapshot().map(Some)
    }

    fn episodes(&self, key: SnapshotKey) -> Result<Vec<u64>> {
        Ok(self
            .storage()
            .get(&key)
            .map(|by_episodes| by_episodes.keys().copied().collect())
            .unwrap_or_default())
    }
}
