//! Link model.

use serde::{Deserialize, Serialize};

/// A bookmarked site belonging to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon URL that takes priority over every discovered favicon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,
    pub category_id: String,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub clicks: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Fields needed to create a link; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub custom_icon: Option<String>,
    pub category_id: String,
    pub clicks: i64,
}

impl NewLink {
    /// Copy a snapshot link, pointing it at `category_id` instead of its stored one.
    pub fn from_snapshot(link: &Link, category_id: String) -> Self {
        Self {
            title: link.title.clone(),
            url: link.url.clone(),
            description: link.description.clone(),
            custom_icon: link.custom_icon.clone(),
            category_id,
            clicks: link.clicks.max(0),
        }
    }
}
