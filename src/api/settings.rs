//! Site settings endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::SiteSettings;
use crate::AppState;

/// GET /api/site-settings - The settings singleton, created on first read.
///
/// Visitors always get something to render: a store failure answers with defaults.
pub async fn get_site_settings(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    match state.repo.get_or_create_site_settings().await {
        Ok(settings) => success(settings),
        Err(e) => {
            tracing::warn!("Serving default site settings: {}", e);
            success(SiteSettings::default())
        }
    }
}
