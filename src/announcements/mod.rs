//! Per-viewer announcement display tracking.
//!
//! A "show once" announcement is suppressed for a viewer after they have seen it.
//! Views are keyed by viewer and the announcement's `createdAt`, so publishing a new
//! announcement shows it to everyone again. Views expire after a configurable TTL
//! and expired views are evicted whenever a new one is recorded.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::SiteSettings;

pub struct AnnouncementTracker {
    repo: Arc<Repository>,
    ttl: Duration,
}

impl AnnouncementTracker {
    pub fn new(repo: Arc<Repository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    /// Whether `viewer` should be shown the current announcement.
    pub async fn should_show(&self, viewer: &str, settings: &SiteSettings) -> Result<bool, AppError> {
        self.should_show_at(viewer, settings, Utc::now()).await
    }

    /// Record that `viewer` saw the current announcement. Returns false when the
    /// announcement is not tracked (disabled, or shown on every visit).
    pub async fn mark_viewed(&self, viewer: &str, settings: &SiteSettings) -> Result<bool, AppError> {
        self.mark_viewed_at(viewer, settings, Utc::now()).await
    }

    async fn should_show_at(
        &self,
        viewer: &str,
        settings: &SiteSettings,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let announcement = &settings.announcement;
        if !announcement.enabled {
            return Ok(false);
        }
        if !announcement.show_once {
            return Ok(true);
        }

        let seen = self
            .repo
            .find_announcement_view(viewer, &announcement.created_at)
            .await?;

        Ok(match seen {
            Some(viewed_at) => viewed_at < self.cutoff(now),
            None => true,
        })
    }

    async fn mark_viewed_at(
        &self,
        viewer: &str,
        settings: &SiteSettings,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let announcement = &settings.announcement;
        if !announcement.enabled || !announcement.show_once {
            return Ok(false);
        }

        self.repo
            .record_announcement_view(viewer, &announcement.created_at, &timestamp(now))
            .await?;

        let evicted = self.repo.evict_announcement_views(&self.cutoff(now)).await?;
        if evicted > 0 {
            tracing::debug!("Evicted {} expired announcement views", evicted);
        }

        Ok(true)
    }

    /// Views recorded before this instant have expired.
    fn cutoff(&self, now: DateTime<Utc>) -> String {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_sub_signed(ttl))
            .map(timestamp)
            // A TTL too large to represent never expires anything.
            .unwrap_or_default()
    }
}

/// Fixed-width UTC timestamps so stored values order correctly as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
