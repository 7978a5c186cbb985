//! Announcement display endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::Announcement;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementCheck {
    pub should_show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement: Option<Announcement>,
}

#[derive(Debug, Deserialize)]
pub struct ViewedRequest {
    pub viewer: String,
}

#[derive(Debug, Serialize)]
pub struct ViewedResponse {
    pub success: bool,
}

/// GET /api/announcement/check/:viewer - Whether to show the announcement.
///
/// Errs on the side of not showing it when the store cannot answer.
pub async fn check_announcement(
    State(state): State<AppState>,
    Path(viewer): Path<String>,
) -> Json<AnnouncementCheck> {
    let hidden = AnnouncementCheck {
        should_show: false,
        announcement: None,
    };

    let settings = match state.repo.get_or_create_site_settings().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Announcement check failed: {}", e);
            return Json(hidden);
        }
    };

    match state.announcements.should_show(&viewer, &settings).await {
        Ok(true) => Json(AnnouncementCheck {
            should_show: true,
            announcement: Some(settings.announcement),
        }),
        Ok(false) => Json(hidden),
        Err(e) => {
            tracing::warn!("Announcement check failed: {}", e);
            Json(hidden)
        }
    }
}

/// POST /api/announcement/viewed - Record that a viewer saw the announcement.
pub async fn mark_announcement_viewed(
    State(state): State<AppState>,
    Json(request): Json<ViewedRequest>,
) -> Json<ViewedResponse> {
    if request.viewer.trim().is_empty() {
        return Json(ViewedResponse { success: false });
    }

    let recorded = match state.repo.get_or_create_site_settings().await {
        Ok(settings) => state.announcements.mark_viewed(&request.viewer, &settings).await,
        Err(e) => Err(e),
    };

    match recorded {
        Ok(_) => Json(ViewedResponse { success: true }),
        Err(e) => {
            tracing::warn!("Failed to record announcement view: {}", e);
            Json(ViewedResponse { success: false })
        }
    }
}
