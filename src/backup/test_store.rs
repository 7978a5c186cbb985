//! In-memory store with failure injection for engine tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::db::NavStore;
use crate::errors::AppError;
use crate::models::{Category, EntityKind, Link, NewCategory, NewLink, SiteSettings, UsageStat};

#[derive(Default)]
pub(super) struct State {
    categories: Vec<Category>,
    links: Vec<Link>,
    settings: Option<SiteSettings>,
    stats: Vec<UsageStat>,
    next_id: u64,
}

/// Non-transactional store: `clear_all` uses the trait's ordered default.
#[derive(Default)]
pub struct MemoryStore {
    pub(super) state: Mutex<State>,
    /// Every read fails
    pub reads_fail: bool,
    /// `clear` fails for these kinds
    pub clear_fails: HashSet<EntityKind>,
    /// Category inserts with these names fail
    pub rejected_categories: HashSet<String>,
    /// Settings inserts fail
    pub settings_insert_fails: bool,
}

impl MemoryStore {
    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn links(&self) -> Vec<Link> {
        self.state.lock().unwrap().links.clone()
    }

    pub fn settings(&self) -> Option<SiteSettings> {
        self.state.lock().unwrap().settings.clone()
    }

    pub fn stats(&self) -> Vec<UsageStat> {
        self.state.lock().unwrap().stats.clone()
    }

    fn read_guard(&self) -> Result<(), AppError> {
        if self.reads_fail {
            Err(AppError::Database("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl NavStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.read_guard()?;
        let mut categories = self.categories();
        categories.sort_by_key(|c| c.order);
        Ok(categories)
    }

    async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.read_guard()?;
        Ok(self.links())
    }

    async fn find_site_settings(&self) -> Result<Option<SiteSettings>, AppError> {
        self.read_guard()?;
        Ok(self.settings())
    }

    async fn list_stats(&self) -> Result<Vec<UsageStat>, AppError> {
        self.read_guard()?;
        Ok(self.stats())
    }

    async fn clear(&self, kind: EntityKind) -> Result<u64, AppError> {
        if self.clear_fails.contains(&kind) {
            return Err(AppError::Database(format!("cannot delete {:?}", kind)));
        }
        let mut state = self.state.lock().unwrap();
        let removed = match kind {
            EntityKind::Categories => std::mem::take(&mut state.categories).len(),
            EntityKind::Links => std::mem::take(&mut state.links).len(),
            EntityKind::SiteSettings => usize::from(state.settings.take().is_some()),
            EntityKind::Stats => std::mem::take(&mut state.stats).len(),
        };
        Ok(removed as u64)
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category, AppError> {
        if self.rejected_categories.contains(&category.name) {
            return Err(AppError::Database("write rejected".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Category {
            id: format!("mem-c{}", state.next_id),
            name: category.name.clone(),
            order: category.order,
            created_at: None,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    async fn insert_link(&self, link: &NewLink) -> Result<Link, AppError> {
        if link.title.is_empty() || link.url.is_empty() {
            return Err(AppError::Validation("title and url are required".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Link {
            id: format!("mem-l{}", state.next_id),
            title: link.title.clone(),
            url: link.url.clone(),
            description: link.description.clone(),
            custom_icon: link.custom_icon.clone(),
            category_id: link.category_id.clone(),
            clicks: link.clicks,
            created_at: None,
        };
        state.links.push(created.clone());
        Ok(created)
    }

    async fn insert_site_settings(&self, settings: &SiteSettings) -> Result<(), AppError> {
        if self.settings_insert_fails {
            return Err(AppError::Database("write rejected".to_string()));
        }
        self.state.lock().unwrap().settings = Some(settings.clone());
        Ok(())
    }

    async fn insert_stat(&self, stat: &UsageStat) -> Result<(), AppError> {
        self.state.lock().unwrap().stats.push(stat.clone());
        Ok(())
    }
}
