//! Site settings singleton and its embedded announcement.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Site name used when nothing has been configured.
pub const DEFAULT_SITE_NAME: &str = "My Navigation Site";

/// Site-wide branding and announcement settings. Exactly one record exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub logo: String,
    /// Regulatory registration number
    #[serde(default)]
    pub icp_number: String,
    /// Public security registration number
    #[serde(default)]
    pub police_number: String,
    /// Start of the uptime counter; generic settings updates leave it alone
    #[serde(default = "now")]
    pub start_time: String,
    #[serde(default)]
    pub announcement: Announcement,
    #[serde(default = "now")]
    pub updated_at: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            logo: String::new(),
            icp_number: String::new(),
            police_number: String::new(),
            start_time: now(),
            announcement: Announcement::default(),
            updated_at: now(),
        }
    }
}

/// Announcement shown to visitors in a modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Seconds before the modal closes itself
    #[serde(default = "default_countdown")]
    pub countdown: i64,
    /// Show to each viewer once per announcement instead of on every visit
    #[serde(default = "default_show_once")]
    pub show_once: bool,
    /// Identifies this announcement for view tracking
    #[serde(default = "now")]
    pub created_at: String,
}

impl Default for Announcement {
    fn default() -> Self {
        Self {
            enabled: false,
            title: String::new(),
            content: String::new(),
            countdown: default_countdown(),
            show_once: default_show_once(),
            created_at: now(),
        }
    }
}

fn default_site_name() -> String {
    DEFAULT_SITE_NAME.to_string()
}

fn default_countdown() -> i64 {
    10
}

fn default_show_once() -> bool {
    true
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: SiteSettings =
            serde_json::from_str(r#"{"siteName":"Links","announcement":{"enabled":true}}"#)
                .unwrap();

        assert_eq!(settings.site_name, "Links");
        assert_eq!(settings.logo, "");
        assert!(settings.announcement.enabled);
        assert_eq!(settings.announcement.countdown, 10);
        assert!(settings.announcement.show_once);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let json = serde_json::to_value(SiteSettings::default()).unwrap();
        assert_eq!(json["siteName"], DEFAULT_SITE_NAME);
        assert!(json["icpNumber"].is_string());
        assert!(json["announcement"]["showOnce"].as_bool().unwrap());
    }
}
