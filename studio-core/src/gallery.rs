//! Session gallery of saved artifacts.
//!
//! Provides a thread-safe [`Gallery`] that tool sessions append to and list
//! from. With a data directory configured, every artifact is mirrored to
//! `<id>.json` so the gallery survives restarts. Semantics are an unordered,
//! last-write-wins list keyed by artifact id.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::{Artifact, ArtifactId};

/// Errors that can occur during gallery operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested artifact does not exist.
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),
    /// The gallery has no data directory.
    #[error("No data directory configured")]
    NoDataDir,
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Thread-safe artifact storage.
///
/// # Example
///
/// ```
/// use studio_core::gallery::Gallery;
/// use studio_core::{Artifact, Complexity, Palette, Style};
///
/// let gallery = Gallery::new();
/// let artifact = Artifact::new(vec![1, 2, 3], Style::Pixel, Palette::default(), Complexity::default(), vec![]);
/// let id = gallery.append(artifact);
/// assert!(gallery.get(id).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    artifacts: Arc<RwLock<HashMap<ArtifactId, Artifact>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl Gallery {
    /// Create an in-memory gallery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gallery with filesystem persistence.
    ///
    /// The directory is created if it doesn't exist. Existing files are not
    /// loaded until [`Gallery::load_from_disk`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            artifacts: Arc::default(),
            data_dir: Some(data_dir),
        })
    }

    /// Add an artifact, replacing any artifact with the same id.
    pub fn append(&self, artifact: Artifact) -> ArtifactId {
        let id = artifact.id;
        self.persist(&artifact);
        let mut artifacts = self
            .artifacts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        artifacts.insert(id, artifact);
        tracing::debug!("Gallery append {id} ({} total)", artifacts.len());
        id
    }

    /// All artifacts, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Artifact> {
        let artifacts = self
            .artifacts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut list: Vec<_> = artifacts.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Get an artifact by id.
    #[must_use]
    pub fn get(&self, id: ArtifactId) -> Option<Artifact> {
        let artifacts = self
            .artifacts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        artifacts.get(&id).cloned()
    }

    /// Remove an artifact and its persisted file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ArtifactNotFound`] if the id is unknown.
    pub fn remove(&self, id: ArtifactId) -> Result<Artifact, StoreError> {
        let removed = {
            let mut artifacts = self
                .artifacts
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            artifacts
                .remove(&id)
                .ok_or_else(|| StoreError::ArtifactNotFound(id.to_string()))?
        };
        self.delete_file(id);
        Ok(removed)
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the gallery is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Load every `*.json` artifact from the data directory into memory.
    ///
    /// Unreadable files are skipped with a warning. Returns the number loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured or it can't be read.
    pub fn load_from_disk(&self) -> Result<usize, StoreError> {
        let data_dir = self.data_dir.as_ref().ok_or(StoreError::NoDataDir)?;
        let mut loaded = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|contents| {
                    Artifact::from_json(&contents)
                        .map_err(|e| StoreError::Serialization(e.to_string()))
                });
            match parsed {
                Ok(artifact) => loaded.push(artifact),
                Err(e) => tracing::warn!("Skipping gallery file {}: {e}", path.display()),
            }
        }

        let count = loaded.len();
        let mut artifacts = self
            .artifacts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for artifact in loaded {
            artifacts.insert(artifact.id, artifact);
        }
        Ok(count)
    }

    /// Save an artifact to disk as JSON.
    ///
    /// No-op if the gallery was created without a data directory.
    fn persist(&self, artifact: &Artifact) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let json = match artifact.to_json() {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize artifact {}: {e}", artifact.id);
                return;
            }
        };
        let path = data_dir.join(format!("{}.json", artifact.id));
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!(
                "Failed to persist artifact {} to {}: {e}",
                artifact.id,
                path.display()
            );
        }
    }

    /// Remove an artifact's persisted file, if any.
    fn delete_file(&self, id: ArtifactId) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let path = data_dir.join(format!("{id}.json"));
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to delete artifact file {}: {e}", path.display());
            }
        }
    }
}
