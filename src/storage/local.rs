use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::InventoryConfig;
use crate::storage::ScanError;

/// A qualifying file found in the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    pub filename: String,
    pub size: u64,
}

/// Read-only view of the local upload directory
pub struct UploadDirectory {
    base_path: PathBuf,
    extension: String,
}

impl UploadDirectory {
    pub fn new(base_path: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(&config.upload_dir, &config.extension)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn qualifies(&self, name: &str) -> bool {
        name.ends_with(&self.extension)
    }

    /// Names of qualifying entries, in directory listing order
    pub async fn list_names(&self) -> Result<Vec<String>, ScanError> {
        let read_dir_err = |source| ScanError::ReadDir {
            path: self.base_path.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.base_path).await.map_err(read_dir_err)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::warn!("Skipping non UTF-8 entry {:?} in {:?}", file_name, self.base_path);
                continue;
            };
            if self.qualifies(name) {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Qualifying entries with their current size on disk
    pub async fn scan(&self) -> Result<Vec<VideoEntry>, ScanError> {
        let names = self.list_names().await?;
        let mut videos = Vec::with_capacity(names.len());

        for filename in names {
            let full_path = self.base_path.join(&filename);
            let metadata = fs::metadata(&full_path)
                .await
                .map_err(|source| ScanError::Stat {
                    path: full_path,
                    source,
                })?;
            videos.push(VideoEntry {
                filename,
                size: metadata.len(),
            });
        }

        Ok(videos)
    }

    /// Number of qualifying entries; no per-file stat is performed
    pub async fn count(&self) -> Result<usize, ScanError> {
        Ok(self.list_names().await?.len())
    }
}
