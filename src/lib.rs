//! Navigation Site Backend
//!
//! REST backend for a link navigation site: public category/link listing with
//! favicon plans, announcement tracking, and admin backup/restore over SQLite.

pub mod announcements;
pub mod api;
pub mod auth;
pub mod backup;
pub mod config;
pub mod credentials;
pub mod db;
pub mod errors;
pub mod icons;
pub mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use announcements::AnnouncementTracker;
use config::Config;
use credentials::CredentialStore;
use db::Repository;

/// Room for multipart framing around an upload of the maximum size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub credentials: Arc<CredentialStore>,
    pub announcements: Arc<AnnouncementTracker>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self {
            credentials: Arc::new(CredentialStore::new(config.credential_path.clone())),
            announcements: Arc::new(AnnouncementTracker::new(
                Arc::clone(&repo),
                config.announcement_view_ttl,
            )),
            repo,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_key = state.config.admin_key.clone();
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let admin_routes = Router::new()
        .route("/backup/stats", get(api::backup_stats))
        .route("/backup/create", post(api::create_backup))
        .route("/backup/restore", post(api::restore_backup))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_key_layer(admin_key.clone(), req, next)
        }));

    let api_routes = Router::new()
        .route("/categories", get(api::list_categories))
        .route("/site-settings", get(api::get_site_settings))
        .route("/announcement/check/{viewer}", get(api::check_announcement))
        .route("/announcement/viewed", post(api::mark_announcement_viewed));

    Router::new()
        .nest("/admin", admin_routes)
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
