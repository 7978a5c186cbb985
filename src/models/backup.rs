//! Backup document format and restore reporting.

use serde::{Deserialize, Serialize};

use super::{Category, CredentialRecord, Link, SiteSettings, UsageStat};

/// Format version written into every backup.
pub const BACKUP_FORMAT_VERSION: &str = "1.0";

/// Producer tag written into every backup.
pub const BACKUP_SOURCE: &str = "nav-website-admin";

/// What a backup covers. Unknown kinds are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackupKind {
    /// Everything, including usage statistics and the admin credential
    #[default]
    Full,
    /// Categories, links and settings only
    CategoriesOnly,
    Other(String),
}

impl BackupKind {
    pub fn as_str(&self) -> &str {
        match self {
            BackupKind::Full => "full",
            BackupKind::CategoriesOnly => "categories-only",
            BackupKind::Other(kind) => kind,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, BackupKind::Full)
    }
}

impl From<String> for BackupKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "full" => BackupKind::Full,
            "categories-only" => BackupKind::CategoriesOnly,
            _ => BackupKind::Other(kind),
        }
    }
}

impl From<BackupKind> for String {
    fn from(kind: BackupKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for BackupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header of a backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(rename = "type", default)]
    pub kind: BackupKind,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub source: String,
}

fn default_version() -> String {
    BACKUP_FORMAT_VERSION.to_string()
}

/// Entity snapshot carried by a backup document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_settings: Option<SiteSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<UsageStat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<CredentialRecord>,
}

/// A complete, portable snapshot of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub metadata: BackupMetadata,
    pub data: BackupData,
}

impl BackupDocument {
    /// File name offered when the document is downloaded.
    pub fn file_name(&self) -> String {
        let date = self
            .metadata
            .created_at
            .get(..10)
            .unwrap_or(&self.metadata.created_at);
        format!("nav-backup-{}-{}.json", self.metadata.kind, date)
    }
}

/// Body of a backup creation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBackupRequest {
    #[serde(rename = "type", default)]
    pub kind: BackupKind,
}

/// Entity groups wiped at the start of a restore, in deletion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Categories,
    Links,
    SiteSettings,
    Stats,
}

impl EntityKind {
    /// Order used when a store cannot clear everything in one transaction.
    pub const CLEAR_ORDER: [EntityKind; 4] = [
        EntityKind::Categories,
        EntityKind::Links,
        EntityKind::SiteSettings,
        EntityKind::Stats,
    ];
}

/// Entities that were present in the document but could not be recreated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntities {
    pub categories: usize,
    pub links: usize,
    pub site_settings: bool,
    pub stats: usize,
    pub admin_password: bool,
}

/// Outcome of a restore: what was actually written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    pub categories: usize,
    pub links: usize,
    pub site_settings: bool,
    pub admin_password: bool,
    pub stats: usize,
    pub skipped: SkippedEntities,
    /// Links kept with their stored category id because it was not in the backup
    pub dangling_links: usize,
    /// Entity groups whose existing records could not be cleared
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uncleared: Vec<EntityKind>,
}

/// Record counts shown before a backup is taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStats {
    pub categories: i64,
    pub links: i64,
    pub settings: bool,
    pub stats: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_kind_round_trips_unknown_values() {
        let kind: BackupKind = serde_json::from_str(r#""links-only""#).unwrap();
        assert_eq!(kind, BackupKind::Other("links-only".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""links-only""#);

        let kind: BackupKind = serde_json::from_str(r#""categories-only""#).unwrap();
        assert_eq!(kind, BackupKind::CategoriesOnly);
        assert!(!kind.is_full());
    }

    #[test]
    fn test_file_name_uses_kind_and_date() {
        let doc = BackupDocument {
            metadata: BackupMetadata {
                version: BACKUP_FORMAT_VERSION.to_string(),
                kind: BackupKind::CategoriesOnly,
                created_at: "2024-05-06T07:08:09+00:00".to_string(),
                source: BACKUP_SOURCE.to_string(),
            },
            data: BackupData::default(),
        };

        assert_eq!(doc.file_name(), "nav-backup-categories-only-2024-05-06.json");
    }

    #[test]
    fn test_document_parses_mongo_style_export() {
        let doc: BackupDocument = serde_json::from_str(
            r#"{
                "metadata": {"version": "1.0", "type": "full", "createdAt": "2024-01-01T00:00:00.000Z", "source": "nav-website-admin"},
                "data": {
                    "categories": [{"_id": "c1", "name": "Search", "order": 1, "__v": 0}],
                    "links": [{"_id": "l1", "title": "Google", "url": "https://www.google.com", "categoryId": "c1"}],
                    "adminPassword": {"hashedPassword": "abc", "updatedAt": "2024-01-01T00:00:00.000Z", "version": "1.0"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.metadata.kind, BackupKind::Full);
        assert_eq!(doc.data.categories[0].id, "c1");
        assert_eq!(doc.data.links[0].clicks, 0);
        assert!(doc.data.site_settings.is_none());
        assert!(doc.data.stats.is_none());
        assert_eq!(doc.data.admin_password.unwrap().hashed_password, "abc");
    }
}
