use url::Url;

use crate::models::Link;

/// Candidate icon URLs for `link`, best first.
///
/// A non-blank custom icon always leads. Site-relative candidates need a URL with a
/// host; when the link URL has none only the custom icon is offered.
pub fn icon_sources(link: &Link) -> Vec<String> {
    let mut sources = Vec::new();

    if let Some(custom) = link.custom_icon.as_deref().map(str::trim) {
        if !custom.is_empty() {
            sources.push(custom.to_string());
        }
    }

    let parsed = match Url::parse(link.url.trim()) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("No site icons for {:?}: {}", link.url, e);
            return sources;
        }
    };
    let Some(host) = parsed.host_str() else {
        return sources;
    };
    let origin = parsed.origin().ascii_serialization();

    sources.extend([
        format!("{}/favicon.ico", origin),
        format!("{}/favicon.png", origin),
        format!("https://www.google.com/s2/favicons?domain={}&sz=32", host),
        format!("{}/apple-touch-icon.png", origin),
        format!("{}/apple-touch-icon-152x152.png", origin),
        format!("{}/android-chrome-192x192.png", origin),
        format!("https://icons.duckduckgo.com/ip3/{}.ico", host),
    ]);

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, custom_icon: Option<&str>) -> Link {
        Link {
            id: "l1".to_string(),
            title: "Example".to_string(),
            url: url.to_string(),
            description: None,
            custom_icon: custom_icon.map(str::to_string),
            category_id: "c1".to_string(),
            clicks: 0,
            created_at: None,
        }
    }

    #[test]
    fn test_sources_in_priority_order() {
        let sources = icon_sources(&link("https://docs.example.com:8443/guide?x=1", None));

        assert_eq!(
            sources,
            vec![
                "https://docs.example.com:8443/favicon.ico",
                "https://docs.example.com:8443/favicon.png",
                "https://www.google.com/s2/favicons?domain=docs.example.com&sz=32",
                "https://docs.example.com:8443/apple-touch-icon.png",
                "https://docs.example.com:8443/apple-touch-icon-152x152.png",
                "https://docs.example.com:8443/android-chrome-192x192.png",
                "https://icons.duckduckgo.com/ip3/docs.example.com.ico",
            ]
        );
    }

    #[test]
    fn test_custom_icon_leads_when_not_blank() {
        let sources = icon_sources(&link("https://example.com", Some("  https://cdn.example.com/i.png ")));
        assert_eq!(sources[0], "https://cdn.example.com/i.png");
        assert_eq!(sources.len(), 8);

        let sources = icon_sources(&link("https://example.com", Some("   ")));
        assert_eq!(sources[0], "https://example.com/favicon.ico");
        assert_eq!(sources.len(), 7);
    }

    #[test]
    fn test_unparseable_url_offers_custom_icon_only() {
        assert!(icon_sources(&link("not a url", None)).is_empty());
        assert_eq!(
            icon_sources(&link("not a url", Some("https://cdn.example.com/i.png"))),
            vec!["https://cdn.example.com/i.png"]
        );
        assert!(icon_sources(&link("mailto:someone@example.com", None)).is_empty());
    }
}
