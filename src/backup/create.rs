//! Snapshot creation.

use chrono::Utc;

use super::{BackupEngine, BackupError};
use crate::db::NavStore;
use crate::models::{
    Announcement, BackupData, BackupDocument, BackupKind, BackupMetadata, Category, Link,
    SiteSettings, BACKUP_FORMAT_VERSION, BACKUP_SOURCE,
};

impl<S: NavStore> BackupEngine<'_, S> {
    /// Snapshot the store.
    ///
    /// Every kind carries categories, links and settings; `full` adds usage stats and
    /// the credential record. Any store read failure aborts with
    /// [`BackupError::StoreUnavailable`]; a credential read failure only drops the
    /// credential from the snapshot.
    pub async fn create_backup(&self, kind: BackupKind) -> Result<BackupDocument, BackupError> {
        tracing::info!("Creating {} backup", kind);

        let categories = self
            .store
            .list_categories()
            .await
            .map_err(BackupError::StoreUnavailable)?;
        let links = self
            .store
            .list_links()
            .await
            .map_err(BackupError::StoreUnavailable)?;
        let site_settings = self
            .store
            .find_site_settings()
            .await
            .map_err(BackupError::StoreUnavailable)?;

        let mut data = BackupData {
            categories,
            links,
            site_settings,
            ..Default::default()
        };

        if kind.is_full() {
            let stats = self
                .store
                .list_stats()
                .await
                .map_err(BackupError::StoreUnavailable)?;
            data.stats = Some(stats);

            data.admin_password = match self.credentials.load().await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Leaving credential out of backup: {}", e);
                    None
                }
            };
        }

        tracing::info!(
            "Backup collected: {} categories, {} links, settings: {}, stats: {}",
            data.categories.len(),
            data.links.len(),
            data.site_settings.is_some(),
            data.stats.as_ref().map_or(0, Vec::len)
        );

        Ok(BackupDocument {
            metadata: stamp(kind),
            data,
        })
    }
}

const PLACEHOLDER_TIME: &str = "2024-01-01T00:00:00.000Z";

/// Stand-in document served when the store cannot be read.
///
/// Same shape as a real backup, with fixed sample content.
pub fn placeholder_document(kind: BackupKind) -> BackupDocument {
    let categories = vec![
        Category {
            id: "1".to_string(),
            name: "Search Engines".to_string(),
            order: 1,
            created_at: None,
        },
        Category {
            id: "2".to_string(),
            name: "Developer Tools".to_string(),
            order: 2,
            created_at: None,
        },
    ];

    let links = vec![
        Link {
            id: "1".to_string(),
            title: "Google".to_string(),
            url: "https://www.google.com".to_string(),
            description: Some("Search engine".to_string()),
            custom_icon: None,
            category_id: "1".to_string(),
            clicks: 0,
            created_at: None,
        },
        Link {
            id: "2".to_string(),
            title: "GitHub".to_string(),
            url: "https://github.com".to_string(),
            description: Some("Code hosting".to_string()),
            custom_icon: None,
            category_id: "2".to_string(),
            clicks: 0,
            created_at: None,
        },
    ];

    let site_settings = SiteSettings {
        start_time: PLACEHOLDER_TIME.to_string(),
        announcement: Announcement {
            created_at: PLACEHOLDER_TIME.to_string(),
            ..Default::default()
        },
        updated_at: PLACEHOLDER_TIME.to_string(),
        ..Default::default()
    };

    BackupDocument {
        metadata: stamp(kind),
        data: BackupData {
            categories,
            links,
            site_settings: Some(site_settings),
            ..Default::default()
        },
    }
}

fn stamp(kind: BackupKind) -> BackupMetadata {
    BackupMetadata {
        version: BACKUP_FORMAT_VERSION.to_string(),
        kind,
        created_at: Utc::now().to_rfc3339(),
        source: BACKUP_SOURCE.to_string(),
    }
}
