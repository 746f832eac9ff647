//! MessagePack implementation of the snapshot repository.
//!
//! Snapshots live as individual MessagePack files in one directory. A JSON
//! manifest in the same directory indexes them by hyperparameters and episode
//! count, so loading never has to parse file names.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    ports::SnapshotRepository,
    q_learning::{QSnapshot, SavedQLearner, SnapshotKey},
};

const MANIFEST: &str = "manifest.json";

/// One stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: SnapshotKey,
    /// Informational copy of the key's discount factor
    pub discount_factor: f64,
    /// Informational copy of the key's decay rate
    pub decay_rate: f64,
    pub episodes: u64,
    /// File name relative to the store directory
    pub file: String,
}

/// Index of every snapshot in a store directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    fn latest(&self, key: SnapshotKey) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.key == key)
            .max_by_key(|entry| entry.episodes)
    }

    fn upsert(&mut self, entry: ManifestEntry) {
        self.entries
            .retain(|existing| !(existing.key == entry.key && existing.episodes == entry.episodes));
        self.entries.push(entry);
    }
}

/// MessagePack-based snapshot repository rooted at a directory.
///
/// # Examples
///
/// ```no_run
/// use rps_predictor::adapters::MsgPackRepository;
/// use rps_predictor::ports::SnapshotRepository;
/// use rps_predictor::q_learning::SnapshotKey;
///
/// let repo = MsgPackRepository::new("snapshots");
/// if let Some(snapshot) = repo.load_latest(SnapshotKey::new(0.9, 0.999))? {
///     println!("{} episodes", snapshot.episodes);
/// }
/// # Ok::<(), rps_predictor::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    dir: PathBuf,
}

impl MsgPackRepository {
    /// Create a repository rooted at `dir`. The directory is created on the
    /// first save.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST)
    }

    /// Read the manifest; a missing manifest is an empty store.
    pub fn manifest(&self) -> Result<Manifest> {
        let path = self.manifest_path();
        match fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(Manifest::default()),
            Err(source) => Err(Error::Io {
                operation: format!("read manifest {path:?}"),
                source,
            }),
        }
    }

    /// Replace the manifest through a temporary file and a rename.
    fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        let path = self.manifest_path();
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(manifest)?;
        fs::write(&tmp, bytes).map_err(|source| Error::Io {
            operation: format!("write manifest {tmp:?}"),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| Error::Io {
            operation: format!("replace manifest {path:?}"),
            source,
        })
    }
}

impl SnapshotRepository for MsgPackRepository {
    fn save(&self, snapshot: &QSnapshot) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Io {
            operation: format!("create snapshot directory {:?}", self.dir),
            source,
        })?;

        let file = snapshot.file_name();
        SavedQLearner::new(snapshot.clone()).save_to_file(self.dir.join(&file))?;

        let key = snapshot.key();
        let mut manifest = self.manifest()?;
        manifest.upsert(ManifestEntry {
            key,
            discount_factor: key.discount_factor(),
            decay_rate: key.decay_rate(),
            episodes: snapshot.episodes,
            file,
        });
        self.write_manifest(&manifest)?;

        debug!(
            "Stored snapshot for {key} at {} episodes in {:?}",
            snapshot.episodes, self.dir
        );
        Ok(())
    }

    fn load_latest(&self, key: SnapshotKey) -> Result<Option<QSnapshot>> {
        let manifest = self.manifest()?;
        let Some(entry) = manifest.latest(key) else {
            return Ok(None);
        };

        let path = self.dir.join(&entry.file);
        if !path.is_file() {
            return Err(Error::MissingSnapshot {
                name: entry.file.clone(),
            });
        }

        SavedQLearner::load_from_file(&path)?.into_snapshot().map(Some)
    }

    fn episodes(&self, key: SnapshotKey) -> Result<Vec<u64>> {
        let mut episodes: Vec<u64> = self
            .manifest()?
            .entries
            .iter()
            .filter(|entry| entry.key == key)
            .map(|entry| entry.episodes)
            .collect();
        episodes.sort_unstable();
        Ok(episodes)
    }
}
