//! Restoring a snapshot into the store.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{BackupEngine, BackupError, CategoryIdMap};
use crate::db::NavStore;
use crate::models::{
    BackupMetadata, Category, CredentialRecord, Link, NewCategory, NewLink, RestoreReport,
    SiteSettings, UsageStat,
};

/// An uploaded backup whose header has been checked but whose entities are still
/// raw JSON.
///
/// Entities are decoded one at a time during the restore, so a single bad record
/// is skipped and counted instead of failing the whole upload.
#[derive(Debug)]
pub struct UploadedBackup {
    pub metadata: BackupMetadata,
    data: UploadedData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedData {
    #[serde(default)]
    categories: Vec<Value>,
    #[serde(default)]
    links: Vec<Value>,
    #[serde(default)]
    site_settings: Option<Value>,
    #[serde(default)]
    stats: Option<Vec<Value>>,
    #[serde(default)]
    admin_password: Option<Value>,
}

/// Parse an uploaded backup.
///
/// The payload must be a JSON object carrying both a `metadata` and a `data`
/// section, and each `data` section must have the right JSON shape; anything else
/// is rejected before the store is touched. Individual entities are not checked
/// here.
pub fn parse_backup(raw: &[u8]) -> Result<UploadedBackup, BackupError> {
    let mut value: Value = serde_json::from_slice(raw)
        .map_err(|e| BackupError::MalformedBackup(format!("not valid JSON: {}", e)))?;

    let object = value
        .as_object_mut()
        .ok_or_else(|| BackupError::MalformedBackup("expected a JSON object".to_string()))?;

    let mut section = |name: &str| match object.remove(name) {
        Some(Value::Null) | None => Err(BackupError::MalformedBackup(format!(
            "missing {} section",
            name
        ))),
        Some(found) => Ok(found),
    };
    let metadata = section("metadata")?;
    let data = section("data")?;

    Ok(UploadedBackup {
        metadata: serde_json::from_value(metadata)
            .map_err(|e| BackupError::MalformedBackup(format!("bad metadata: {}", e)))?,
        data: serde_json::from_value(data)
            .map_err(|e| BackupError::MalformedBackup(format!("bad data section: {}", e)))?,
    })
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(value)
}

impl<S: NavStore> BackupEngine<'_, S> {
    /// Parse `raw` and restore it. A malformed payload leaves the store untouched.
    pub async fn restore_backup(&self, raw: &[u8]) -> Result<RestoreReport, BackupError> {
        let doc = parse_backup(raw)?;
        Ok(self.restore_document(&doc).await)
    }

    /// Replace the store's contents with `doc`.
    ///
    /// Only the initial clear is all-or-nothing. After it, each entity is decoded
    /// and written on its own: one that fails is skipped and counted, and the
    /// restore carries on.
    async fn restore_document(&self, doc: &UploadedBackup) -> RestoreReport {
        let data = &doc.data;
        tracing::info!(
            "Restoring {} backup created at {} ({} categories, {} links)",
            doc.metadata.kind,
            doc.metadata.created_at,
            data.categories.len(),
            data.links.len()
        );

        let mut report = RestoreReport {
            uncleared: self.store.clear_all().await,
            ..Default::default()
        };
        if !report.uncleared.is_empty() {
            tracing::warn!("Restoring over uncleared data: {:?}", report.uncleared);
        }

        // Categories first: links can only be rewritten once every new id is known.
        let mut category_ids = CategoryIdMap::default();
        for raw in &data.categories {
            let category: Category = match decode(raw) {
                Ok(category) => category,
                Err(e) => {
                    tracing::warn!("Skipping undecodable category: {}", e);
                    report.skipped.categories += 1;
                    continue;
                }
            };
            match self.store.insert_category(&NewCategory::from(&category)).await {
                Ok(created) => {
                    category_ids.insert(&category.id, created.id);
                    report.categories += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping category {:?}: {}", category.name, e);
                    report.skipped.categories += 1;
                }
            }
        }
        tracing::debug!("Remapping links through {} category ids", category_ids.len());

        for raw in &data.links {
            let link: Link = match decode(raw) {
                Ok(link) => link,
                Err(e) => {
                    tracing::warn!("Skipping undecodable link: {}", e);
                    report.skipped.links += 1;
                    continue;
                }
            };
            let (category_id, dangling) = match category_ids.resolve(&link.category_id) {
                Some(new_id) => (new_id.to_string(), false),
                None => (link.category_id.clone(), true),
            };

            match self
                .store
                .insert_link(&NewLink::from_snapshot(&link, category_id))
                .await
            {
                Ok(_) => {
                    report.links += 1;
                    if dangling {
                        tracing::warn!(
                            "Link {:?} kept its stored category id {:?}, which is not in the backup",
                            link.title,
                            link.category_id
                        );
                        report.dangling_links += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping link {:?}: {}", link.title, e);
                    report.skipped.links += 1;
                }
            }
        }

        if let Some(raw) = &data.site_settings {
            let written = match decode::<SiteSettings>(raw) {
                Ok(settings) => self.store.insert_site_settings(&settings).await,
                Err(e) => Err(e.into()),
            };
            match written {
                Ok(()) => report.site_settings = true,
                Err(e) => {
                    tracing::warn!("Skipping site settings: {}", e);
                    report.skipped.site_settings = true;
                }
            }
        }

        for raw in data.stats.iter().flatten() {
            let written = match decode::<UsageStat>(raw) {
                Ok(stat) => self.store.insert_stat(&stat).await,
                Err(e) => Err(e.into()),
            };
            match written {
                Ok(()) => report.stats += 1,
                Err(e) => {
                    tracing::warn!("Skipping stats record: {}", e);
                    report.skipped.stats += 1;
                }
            }
        }

        if let Some(raw) = &data.admin_password {
            if doc.metadata.kind.is_full() {
                let written = match decode::<CredentialRecord>(raw) {
                    Ok(record) => self.credentials.overwrite(&record).await,
                    Err(e) => Err(e.into()),
                };
                match written {
                    Ok(()) => report.admin_password = true,
                    Err(e) => {
                        tracing::warn!("Skipping credential record: {}", e);
                        report.skipped.admin_password = true;
                    }
                }
            } else {
                tracing::info!(
                    "Ignoring credential record in {} backup",
                    doc.metadata.kind
                );
            }
        }

        tracing::info!(
            "Restore finished: {} categories, {} links, settings: {}, stats: {}, credential: {}",
            report.categories,
            report.links,
            report.site_settings,
            report.stats,
            report.admin_password
        );

        report
    }
}
