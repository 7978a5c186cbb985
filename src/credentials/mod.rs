//! File-backed storage for the admin credential record.
//!
//! The record lives in its own JSON file so that wiping the database during a
//! restore never locks the admin out.

use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::CredentialRecord;

/// Reads and writes the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current record. A missing file is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<CredentialRecord>, AppError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record = serde_json::from_str(&content).map_err(|e| {
            AppError::Internal(format!(
                "Credential file {} is unreadable: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(record))
    }

    /// Replace the stored record as-is.
    ///
    /// Only the restore path calls this; it skips the change-password rules on
    /// purpose since the record comes from a trusted backup.
    pub async fn overwrite(&self, record: &CredentialRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!("Credential record written to {}", self.path.display());
        Ok(())
    }
}
