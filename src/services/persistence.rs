//! Persistence service: the settings record as a JSON file.
//!
//! DESIGN
//! ======
//! The whole record is written on every save: serialize, write to a
//! sibling temp file, then rename over the target so readers never see a
//! half-written file. A missing file on start-up is created with the
//! default record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use panel::SettingsRecord;
use tracing::info;

/// Errors produced while reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not a valid record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Location of the persisted settings record.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored record, creating the file with defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the default record cannot be written.
    pub async fn load_or_init(&self) -> Result<SettingsRecord, PersistError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let record = SettingsRecord::builtin();
                self.write(&record).await?;
                info!(path = %self.path.display(), "created settings file with defaults");
                Ok(record)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file contents with `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, temp file, or rename fails. A failed
    /// rename removes the temp file.
    pub async fn write(&self, record: &SettingsRecord) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec_pretty(record)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
