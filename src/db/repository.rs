//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::NavStore;
use crate::errors::AppError;
use crate::models::{
    Announcement, BackupStats, Category, EntityKind, Link, NewCategory, NewLink, SiteSettings,
    UsageStat,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== SETTINGS OPERATIONS ====================

    /// Get the settings singleton, creating it with defaults if absent.
    pub async fn get_or_create_site_settings(&self) -> Result<SiteSettings, AppError> {
        if let Some(settings) = self.find_site_settings().await? {
            return Ok(settings);
        }

        let settings = SiteSettings::default();
        let announcement_json = serde_json::to_string(&settings.announcement)?;

        // OR IGNORE: a concurrent reader may have created it first
        sqlx::query(
            "INSERT OR IGNORE INTO site_settings (id, site_name, logo, icp_number, police_number, start_time, announcement, updated_at) VALUES (1, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&settings.site_name)
        .bind(&settings.logo)
        .bind(&settings.icp_number)
        .bind(&settings.police_number)
        .bind(&settings.start_time)
        .bind(&announcement_json)
        .bind(&settings.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_site_settings()
            .await?
            .ok_or_else(|| AppError::Internal("Site settings vanished after insert".to_string()))
    }

    // ==================== COUNT OPERATIONS ====================

    /// Count records for the backup page. Each count is read concurrently and falls
    /// back to zero on its own failure.
    pub async fn backup_stats(&self) -> BackupStats {
        let (categories, links, settings, stats) = tokio::join!(
            self.count("SELECT COUNT(*) AS n FROM categories"),
            self.count("SELECT COUNT(*) AS n FROM links"),
            self.count("SELECT COUNT(*) AS n FROM site_settings"),
            self.count("SELECT COUNT(*) AS n FROM usage_stats"),
        );

        BackupStats {
            categories: categories.unwrap_or(0),
            links: links.unwrap_or(0),
            settings: settings.map(|n| n > 0).unwrap_or(false),
            stats: stats.unwrap_or(0),
        }
    }

    async fn count(&self, sql: &'static str) -> Result<i64, AppError> {
        let row = sqlx::query(sql).fetch_one(&self.pool).await?;
        Ok(row.get("n"))
    }

    // ==================== ANNOUNCEMENT VIEW OPERATIONS ====================

    /// When `viewer` last saw the announcement created at `announcement_created_at`.
    pub async fn find_announcement_view(
        &self,
        viewer: &str,
        announcement_created_at: &str,
    ) -> Result<Option<String>, AppError> {
        let row = sqlx::query(
            "SELECT viewed_at FROM announcement_views WHERE viewer = ? AND announcement_created_at = ?",
        )
        .bind(viewer)
        .bind(announcement_created_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("viewed_at")))
    }

    /// Record (or refresh) a view.
    pub async fn record_announcement_view(
        &self,
        viewer: &str,
        announcement_created_at: &str,
        viewed_at: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO announcement_views (viewer, announcement_created_at, viewed_at) VALUES (?, ?, ?) \
             ON CONFLICT(viewer, announcement_created_at) DO UPDATE SET viewed_at = excluded.viewed_at",
        )
        .bind(viewer)
        .bind(announcement_created_at)
        .bind(viewed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete views recorded before `cutoff` (RFC 3339), returning how many went.
    pub async fn evict_announcement_views(&self, cutoff: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM announcement_views WHERE viewed_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl NavStore for Repository {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, sort_order, created_at FROM categories ORDER BY sort_order, created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, url, description, custom_icon, category_id, clicks, created_at FROM links ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(link_from_row).collect())
    }

    async fn find_site_settings(&self) -> Result<Option<SiteSettings>, AppError> {
        let row = sqlx::query(
            "SELECT site_name, logo, icp_number, police_number, start_time, announcement, updated_at FROM site_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(settings_from_row))
    }

    async fn list_stats(&self) -> Result<Vec<UsageStat>, AppError> {
        let rows = sqlx::query(
            "SELECT id, visits, last_updated, kind, value, date, ip, link_id FROM usage_stats ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(stat_from_row).collect())
    }

    async fn clear(&self, kind: EntityKind) -> Result<u64, AppError> {
        let result = sqlx::query(clear_statement(kind))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Clears all four tables in one transaction: either everything goes or nothing does.
    async fn clear_all(&self) -> Vec<EntityKind> {
        let outcome = async {
            let mut tx = self.pool.begin().await?;
            for kind in EntityKind::CLEAR_ORDER {
                sqlx::query(clear_statement(kind)).execute(&mut *tx).await?;
            }
            tx.commit().await?;
            Ok::<(), AppError>(())
        }
        .await;

        match outcome {
            Ok(()) => Vec::new(),
            Err(e) => {
                tracing::warn!("Clearing store failed, nothing was deleted: {}", e);
                EntityKind::CLEAR_ORDER.to_vec()
            }
        }
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category, AppError> {
        if category.name.trim().is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO categories (id, name, sort_order, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&category.name)
            .bind(category.order)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id,
            name: category.name.clone(),
            order: category.order,
            created_at: Some(now),
        })
    }

    async fn insert_link(&self, link: &NewLink) -> Result<Link, AppError> {
        if link.title.trim().is_empty() {
            return Err(AppError::Validation("Link title is required".to_string()));
        }
        if link.url.trim().is_empty() {
            return Err(AppError::Validation("Link URL is required".to_string()));
        }
        if link.category_id.is_empty() {
            return Err(AppError::Validation("Link category is required".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO links (id, title, url, description, custom_icon, category_id, clicks, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&link.title)
        .bind(&link.url)
        .bind(&link.description)
        .bind(&link.custom_icon)
        .bind(&link.category_id)
        .bind(link.clicks)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Link {
            id,
            title: link.title.clone(),
            url: link.url.clone(),
            description: link.description.clone(),
            custom_icon: link.custom_icon.clone(),
            category_id: link.category_id.clone(),
            clicks: link.clicks,
            created_at: Some(now),
        })
    }

    async fn insert_site_settings(&self, settings: &SiteSettings) -> Result<(), AppError> {
        let announcement_json = serde_json::to_string(&settings.announcement)?;

        sqlx::query(
            "INSERT OR REPLACE INTO site_settings (id, site_name, logo, icp_number, police_number, start_time, announcement, updated_at) VALUES (1, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&settings.site_name)
        .bind(&settings.logo)
        .bind(&settings.icp_number)
        .bind(&settings.police_number)
        .bind(&settings.start_time)
        .bind(&announcement_json)
        .bind(&settings.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_stat(&self, stat: &UsageStat) -> Result<(), AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO usage_stats (id, visits, last_updated, kind, value, date, ip, link_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(stat.visits)
        .bind(&stat.last_updated)
        .bind(&stat.kind)
        .bind(stat.value)
        .bind(&stat.date)
        .bind(&stat.ip)
        .bind(&stat.link_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn clear_statement(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Categories => "DELETE FROM categories",
        EntityKind::Links => "DELETE FROM links",
        EntityKind::SiteSettings => "DELETE FROM site_settings",
        EntityKind::Stats => "DELETE FROM usage_stats",
    }
}

// Helper functions for row conversion

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        order: row.get("sort_order"),
        created_at: row.get("created_at"),
    }
}

fn link_from_row(row: &sqlx::sqlite::SqliteRow) -> Link {
    Link {
        id: row.get("id"),
        title: row.get("title"),
        url: row.get("url"),
        description: row.get("description"),
        custom_icon: row.get("custom_icon"),
        category_id: row.get("category_id"),
        clicks: row.get("clicks"),
        created_at: row.get("created_at"),
    }
}

fn settings_from_row(row: &sqlx::sqlite::SqliteRow) -> SiteSettings {
    let announcement_str: String = row.get("announcement");
    SiteSettings {
        site_name: row.get("site_name"),
        logo: row.get("logo"),
        icp_number: row.get("icp_number"),
        police_number: row.get("police_number"),
        start_time: row.get("start_time"),
        announcement: parse_announcement(&announcement_str),
        updated_at: row.get("updated_at"),
    }
}

fn stat_from_row(row: &sqlx::sqlite::SqliteRow) -> UsageStat {
    UsageStat {
        id: row.get("id"),
        visits: row.get("visits"),
        last_updated: row.get("last_updated"),
        kind: row.get("kind"),
        value: row.get("value"),
        date: row.get("date"),
        ip: row.get("ip"),
        link_id: row.get("link_id"),
    }
}

fn parse_announcement(s: &str) -> Announcement {
    serde_json::from_str(s).unwrap_or_default()
}
