//! Document-store seam used by the backup engine.

use std::future::Future;

use crate::errors::AppError;
use crate::models::{Category, EntityKind, Link, NewCategory, NewLink, SiteSettings, UsageStat};

/// Find/create/delete-all access per entity type.
///
/// The SQLite [`Repository`](super::Repository) is the production implementation.
pub trait NavStore: Send + Sync {
    /// All categories, ascending by display order.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, AppError>> + Send;

    /// All links, in no particular order.
    fn list_links(&self) -> impl Future<Output = Result<Vec<Link>, AppError>> + Send;

    /// The settings singleton, without creating it when absent.
    fn find_site_settings(
        &self,
    ) -> impl Future<Output = Result<Option<SiteSettings>, AppError>> + Send;

    fn list_stats(&self) -> impl Future<Output = Result<Vec<UsageStat>, AppError>> + Send;

    /// Delete every record of one kind, returning how many went.
    fn clear(&self, kind: EntityKind) -> impl Future<Output = Result<u64, AppError>> + Send;

    /// Delete categories, links, settings and stats, returning the kinds that could
    /// not be cleared.
    ///
    /// Stores without multi-entity transactions use this default, which deletes in
    /// [`EntityKind::CLEAR_ORDER`] and keeps going past failures.
    fn clear_all(&self) -> impl Future<Output = Vec<EntityKind>> + Send {
        async move {
            let mut uncleared = Vec::new();
            for kind in EntityKind::CLEAR_ORDER {
                if let Err(e) = self.clear(kind).await {
                    tracing::warn!("Failed to clear {:?}: {}", kind, e);
                    uncleared.push(kind);
                }
            }
            uncleared
        }
    }

    /// Create a category under a freshly assigned id.
    fn insert_category(
        &self,
        category: &NewCategory,
    ) -> impl Future<Output = Result<Category, AppError>> + Send;

    /// Create a link under a freshly assigned id. The category id is stored as given.
    fn insert_link(&self, link: &NewLink) -> impl Future<Output = Result<Link, AppError>> + Send;

    /// Write the settings singleton, replacing any existing record.
    fn insert_site_settings(
        &self,
        settings: &SiteSettings,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn insert_stat(&self, stat: &UsageStat) -> impl Future<Output = Result<(), AppError>> + Send;
}
