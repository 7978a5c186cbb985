//! Usage statistics records.

use serde::{Deserialize, Serialize};

/// One usage statistics record.
///
/// Older deployments kept a single aggregate (`visits`, `lastUpdated`); newer backups
/// carry per-event records (`type`, `value`, `date`, `ip`, `linkId`). Both shapes
/// share this type and every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStat {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visits: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Not remapped on restore; stats are never joined against links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
}
