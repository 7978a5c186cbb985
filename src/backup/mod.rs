//! Backup and restore of the whole site.
//!
//! [`BackupEngine::create_backup`] snapshots every entity into a
//! [`BackupDocument`](crate::models::BackupDocument);
//! [`BackupEngine::restore_backup`] wipes the store and rebuilds it from one,
//! rewriting link → category references through a [`CategoryIdMap`] because the
//! store hands out fresh ids on every insert.

mod create;
mod remap;
mod restore;
#[cfg(test)]
mod test_store;

pub use create::placeholder_document;
pub use remap::CategoryIdMap;

use thiserror::Error;

use crate::credentials::CredentialStore;
use crate::db::NavStore;
use crate::errors::AppError;

/// Failures that stop a backup operation as a whole.
///
/// Per-entity restore failures and dangling category references are not errors;
/// they are counted in the [`RestoreReport`](crate::models::RestoreReport).
#[derive(Debug, Error)]
pub enum BackupError {
    /// The store could not be read while taking a snapshot.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] AppError),

    /// The uploaded document is not a backup; nothing was modified.
    #[error("malformed backup: {0}")]
    MalformedBackup(String),
}

impl From<BackupError> for AppError {
    fn from(err: BackupError) -> Self {
        match err {
            BackupError::StoreUnavailable(source) => AppError::StoreUnavailable(source.message()),
            BackupError::MalformedBackup(msg) => AppError::MalformedBackup(msg),
        }
    }
}

/// Runs backups and restores against a store and the credential file.
pub struct BackupEngine<'a, S> {
    store: &'a S,
    credentials: &'a CredentialStore,
}

impl<'a, S: NavStore> BackupEngine<'a, S> {
    pub fn new(store: &'a S, credentials: &'a CredentialStore) -> Self {
        Self { store, credentials }
    }
}
