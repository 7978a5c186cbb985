//! Old → new category id mapping used while restoring links.

use std::collections::HashMap;

/// Maps category ids found in a snapshot to the ids the store assigned when the
/// categories were recreated.
#[derive(Debug, Default)]
pub struct CategoryIdMap {
    ids: HashMap<String, String>,
}

impl CategoryIdMap {
    /// Record that snapshot category `old_id` now lives under `new_id`.
    ///
    /// Blank snapshot ids are ignored; nothing could refer to them.
    pub fn insert(&mut self, old_id: &str, new_id: String) {
        if old_id.is_empty() {
            return;
        }
        self.ids.insert(old_id.to_string(), new_id);
    }

    /// The new id for `old_id`, if that category was recreated.
    pub fn resolve(&self, old_id: &str) -> Option<&str> {
        self.ids.get(old_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
