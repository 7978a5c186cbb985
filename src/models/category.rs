//! Category model.

use serde::{Deserialize, Serialize};

/// A named group of links shown as one section of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store-assigned identifier, only stable within one store generation
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub name: String,
    /// Ascending display position
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Fields needed to create a category; the store assigns id and timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub order: i64,
}

impl From<&Category> for NewCategory {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            order: category.order,
        }
    }
}
