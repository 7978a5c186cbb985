//! Public category listing.

use std::collections::HashMap;

use axum::extract::State;
use serde::Serialize;

use super::{success, ApiResult};
use crate::db::NavStore;
use crate::icons::IconPlan;
use crate::models::{Category, Link};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LinkCard {
    #[serde(flatten)]
    pub link: Link,
    pub icon: IconPlan,
}

#[derive(Debug, Serialize)]
pub struct CategoryWithLinks {
    #[serde(flatten)]
    pub category: Category,
    pub links: Vec<LinkCard>,
}

/// GET /api/categories - Categories in display order, each with its links.
///
/// Links whose category no longer exists are not listed.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryWithLinks>> {
    let categories = state.repo.list_categories().await?;
    let links = state.repo.list_links().await?;

    let mut by_category: HashMap<String, Vec<LinkCard>> = HashMap::new();
    for link in links {
        let icon = IconPlan::for_link(&link);
        by_category
            .entry(link.category_id.clone())
            .or_default()
            .push(LinkCard { link, icon });
    }

    let listing = categories
        .into_iter()
        .map(|category| CategoryWithLinks {
            links: by_category.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect();

    success(listing)
}
