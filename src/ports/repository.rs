//! Repository port for Q-learning snapshot persistence.
//!
//! Snapshots are addressed by their hyperparameters and episode count. A store
//! may hold many snapshots for one key; loading always picks the most trained.

use crate::{
    Result,
    q_learning::{QSnapshot, SnapshotKey},
};

/// Port for persisting and loading Q-learning snapshots.
///
/// # Examples
///
/// ```
/// use rps_predictor::adapters::InMemoryRepository;
/// use rps_predictor::ports::SnapshotRepository;
/// use rps_predictor::q_learning::SnapshotKey;
///
/// let repo = InMemoryRepository::new();
/// let latest = repo.load_latest(SnapshotKey::new(0.9, 0.999))?;
/// assert!(latest.is_none());
/// # Ok::<(), rps_predictor::Error>(())
/// ```
pub trait SnapshotRepository {
    /// Store a snapshot under its key and episode count.
    ///
    /// Saving the same key and episode count twice replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    fn save(&self, snapshot: &QSnapshot) -> Result<()>;

    /// Load the snapshot with the highest episode count for `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreadable or the snapshot is corrupt.
    fn load_latest(&self, key: SnapshotKey) -> Result<Option<QSnapshot>>;

    /// Episode counts stored for `key`, ascending.
    fn episodes(&self, key: SnapshotKey) -> Result<Vec<u64>>;
}
