//! Data models for the navigation site.
//!
//! Field names follow the JSON documents the site has always exchanged, so backups
//! written by earlier deployments load without conversion.

mod backup;
mod category;
mod credential;
mod link;
mod settings;
mod stats;

pub use backup::*;
pub use category::*;
pub use credential::*;
pub use link::*;
pub use settings::*;
pub use stats::*;

use serde::{Deserialize, Deserializer};

/// Counters written as `null` by older deployments read as zero.
fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Option::<i64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_counters_read_as_zero() {
        let link: Link = serde_json::from_str(
            r#"{"_id": "l1", "title": "Docs", "url": "https://docs.rs", "categoryId": "c1", "clicks": null}"#,
        )
        .unwrap();
        assert_eq!(link.clicks, 0);

        let category: Category =
            serde_json::from_str(r#"{"_id": "c1", "name": "Rust", "order": null}"#).unwrap();
        assert_eq!(category.order, 0);

        let category: Category = serde_json::from_str(r#"{"name": "Rust", "order": 3}"#).unwrap();
        assert_eq!(category.order, 3);
    }
}
