//! Snapshots of learned Q-learning state.

use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::q_table::QTable;
use crate::{Error, Result};

/// Hyperparameters a snapshot is filed under.
///
/// The learning rate adapts per state-action and is not part of the key.
/// Floats are compared bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotKey {
    discount_bits: u64,
    decay_bits: u64,
}

impl SnapshotKey {
    pub fn new(discount_factor: f64, decay_rate: f64) -> Self {
        Self {
            discount_bits: discount_factor.to_bits(),
            decay_bits: decay_rate.to_bits(),
        }
    }

    pub fn discount_factor(&self) -> f64 {
        f64::from_bits(self.discount_bits)
    }

    pub fn decay_rate(&self) -> f64 {
        f64::from_bits(self.decay_bits)
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}_d{}", self.discount_factor(), self.decay_rate())
    }
}

/// Everything a Q-learner needs to resume where training stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QSnapshot {
    pub q_table: QTable,
    pub episodes: u64,
    pub discount_factor: f64,
    pub epsilon: f64,
    pub decay_rate: f64,
}

impl QSnapshot {
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey::new(self.discount_factor, self.decay_rate)
    }

    /// Name under which stores file this snapshot.
    pub fn file_name(&self) -> String {
        format!("q_rps_ep{}_{}.msgpack", self.episodes, self.key())
    }
}

/// Versioned on-disk envelope around a [`QSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQLearner {
    pub version: u32,
    pub snapshot: QSnapshot,
}

impl SavedQLearner {
    pub const VERSION: u32 = 1;

    pub fn new(snapshot: QSnapshot) -> Self {
        Self {
            version: Self::VERSION,
            snapshot,
        }
    }

    /// Unwrap the snapshot, rejecting unknown format versions.
    pub fn into_snapshot(self) -> Result<QSnapshot> {
        if self.version != Self::VERSION {
            return Err(Error::SnapshotVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(self.snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-learning snapshot".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-learning snapshot".to_string(),
            message: e.to_string(),
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-learning snapshot to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize Q-learning snapshot from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::QState;

    fn snapshot() -> QSnapshot {
        let mut q_table = QTable::new();
        q_table.ensure(QState::Unseeded);
        QSnapshot {
            q_table,
            episodes: 42,
            discount_factor: 0.9,
            epsilon: 0.25,
            decay_rate: 0.999,
        }
    }

    #[test]
    fn bytes_roundtrip() {
        let saved = SavedQLearner::new(snapshot());
        let restored = SavedQLearner::from_bytes(&saved.to_bytes().unwrap())
            .unwrap()
            .into_snapshot()
            .unwrap();
        assert_eq!(restored.episodes, 42);
        assert_eq!(restored.q_table.len(), 1);
        assert_eq!(restored.key(), SnapshotKey::new(0.9, 0.999));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut saved = SavedQLearner::new(snapshot());
        saved.version = 99;
        assert!(matches!(
            saved.into_snapshot(),
            Err(Error::SnapshotVersion { found: 99, .. })
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(SavedQLearner::from_bytes(b"not a snapshot").is_err());
    }

    #[test]
    fn file_name_carries_episodes_and_key() {
        assert_eq!(snapshot().file_name(), "q_rps_ep42_g0.9_d0.999.msgpack");
    }
}
