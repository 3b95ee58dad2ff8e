//! Local filesystem live-doc store.
//!
//! Implements `LiveDocStore` from `guriri-core` as a flat directory
//! (`{data_dir}/uploads/` in production). File names are produced by the
//! intake service and must be a single path component.

use std::path::{Path, PathBuf};

use guriri_core::storage::live_doc_store::LiveDocStore;
use guriri_types::error::StorageError;
use guriri_types::live_doc::LiveDocFile;

/// Flat directory of uploaded files.
#[derive(Debug, Clone)]
pub struct LocalLiveDocStore {
    base_dir: PathBuf,
}

impl LocalLiveDocStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn validate_name(file_name: &str) -> Result<(), StorageError> {
        let single_component = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if file_name.is_empty() || !single_component {
            return Err(StorageError::InvalidInput(format!(
                "invalid file name '{file_name}'"
            )));
        }
        Ok(())
    }

    async fn sorted_file_names(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl LiveDocStore for LocalLiveDocStore {
    async fn store(&self, file_name: &str, content: &[u8]) -> Result<String, StorageError> {
        Self::validate_name(file_name)?;
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let path = self.base_dir.join(file_name);
        tokio::fs::write(&path, content).await?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Live doc written");
        Ok(path.display().to_string())
    }

    async fn find_first_matching(&self, needle: &str) -> Result<LiveDocFile, StorageError> {
        let names = self.sorted_file_names().await?;
        let Some(file_name) = names.into_iter().find(|name| name.contains(needle)) else {
            return Err(StorageError::NotFound(needle.to_string()));
        };

        let content = tokio::fs::read(self.base_dir.join(&file_name)).await?;
        Ok(LiveDocFile { file_name, content })
    }
}
