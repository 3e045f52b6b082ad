use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{PlannerError, Result};

/// Keeps rendered itineraries so they can be downloaded later by name.
#[async_trait]
pub trait ArtifactStore: Send + Sync + std::fmt::Debug {
    /// Store the bytes and return the generated artifact name.
    async fn put(&self, bytes: Vec<u8>) -> Result<String>;

    /// Fetch a stored artifact. `Ok(None)` when nothing is stored under `name`.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// Stores artifacts as `itinerary_<uuid>.pdf` files in one directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(name) {
            warn!(target: "trip::storage", name, "rejected artifact name");
            return Err(PlannerError::InvalidArtifactName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            PlannerError::Storage(format!(
                "Failed to create {}: {err}",
                self.root.display()
            ))
        })?;

        let name = format!("itinerary_{}.pdf", Uuid::new_v4());
        let path = self.root.join(&name);
        tokio::fs::write(&path, &bytes).await.map_err(|err| {
            PlannerError::Storage(format!("Failed to write {}: {err}", path.display()))
        })?;

        debug!(target: "trip::storage", name = %name, bytes = bytes.len(), "artifact stored");
        Ok(name)
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PlannerError::Storage(format!(
                "Failed to read {}: {err}",
                path.display()
            ))),
        }
    }
}

/// A single path component: no separators, no parent references, not hidden.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().and_then(|part| part.to_str()) == Some(name)
}
