use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};

use super::{CascadeState, Effect, FallbackIcon, IconCascade, TimerId};
use crate::models::Link;

/// Intrinsic size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum IconLoadError {
    #[error("icon request failed: {0}")]
    Request(String),
}

/// Fetches an icon and reports its size.
pub trait IconLoader: Send + Sync {
    fn load(&self, url: &str)
        -> impl Future<Output = Result<IconDimensions, IconLoadError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIcon {
    Source { index: usize, url: String },
    Fallback(FallbackIcon),
}

/// Run `cascade` to completion against `loader`.
///
/// Each load races its timer; whichever finishes first is fed back into the cascade
/// and the loser is dropped.
pub async fn resolve_icon<L: IconLoader>(loader: &L, mut cascade: IconCascade) -> ResolvedIcon {
    let mut effects: VecDeque<Effect> = cascade.start().into();
    let mut in_flight: Option<(usize, String)> = None;
    let mut timer: Option<(TimerId, Instant)> = None;

    loop {
        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::Load { index, url } => in_flight = Some((index, url)),
                Effect::ArmTimer { timer: id, after } => timer = Some((id, Instant::now() + after)),
                Effect::CancelTimer(id) => {
                    if timer.is_some_and(|(armed, _)| armed == id) {
                        timer = None;
                    }
                }
                Effect::ShowFallback(icon) => return ResolvedIcon::Fallback(icon),
            }
        }

        if let CascadeState::Success(index) = cascade.state() {
            return ResolvedIcon::Source {
                index,
                url: cascade.sources()[index].clone(),
            };
        }

        let Some((index, url)) = in_flight.take() else {
            return ResolvedIcon::Fallback(cascade.fallback().clone());
        };

        let expiry = async {
            match timer {
                Some((id, deadline)) => {
                    sleep_until(deadline).await;
                    id
                }
                None => std::future::pending().await,
            }
        };

        let next = tokio::select! {
            result = loader.load(&url) => match result {
                Ok(size) => cascade.on_load(index, size.width, size.height),
                Err(e) => {
                    tracing::debug!("Icon source {} failed: {}", url, e);
                    cascade.on_error(index)
                }
            },
            id = expiry => cascade.on_timeout(id),
        };
        effects.extend(next);
    }
}

/// Resolve icons for every link concurrently, one independent cascade each.
///
/// Returns the outcome keyed by link id.
pub async fn resolve_icons<L>(loader: Arc<L>, links: &[Link]) -> HashMap<String, ResolvedIcon>
where
    L: IconLoader + 'static,
{
    let mut tasks = JoinSet::new();
    for link in links {
        let loader = Arc::clone(&loader);
        let id = link.id.clone();
        let cascade = IconCascade::for_link(link);
        tasks.spawn(async move { (id, resolve_icon(loader.as_ref(), cascade).await) });
    }

    let mut resolved = HashMap::with_capacity(links.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, icon)) => {
                resolved.insert(id, icon);
            }
            Err(e) => tracing::error!("Icon task failed: {}", e),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::icons::{fallback_icon, LOAD_TIMEOUT};

    enum Behavior {
        Fail,
        Silent,
        Size(u32, u32, Duration),
    }

    /// Answers per URL; unknown URLs fail.
    struct ScriptedLoader {
        script: HashMap<String, Behavior>,
    }

    impl ScriptedLoader {
        fn new(script: impl IntoIterator<Item = (String, Behavior)>) -> Self {
            Self {
                script: script.into_iter().collect(),
            }
        }
    }

    impl IconLoader for ScriptedLoader {
        async fn load(&self, url: &str) -> Result<IconDimensions, IconLoadError> {
            match self.script.get(url) {
                Some(Behavior::Size(width, height, delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(IconDimensions {
                        width: *width,
                        height: *height,
                    })
                }
                Some(Behavior::Silent) => std::future::pending().await,
                Some(Behavior::Fail) | None => Err(IconLoadError::Request(url.to_string())),
            }
        }
    }

    fn sources(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("https://example.com/icon-{}.png", i))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_usable_source_wins() {
        let urls = sources(4);
        let loader = ScriptedLoader::new([
            (urls[0].clone(), Behavior::Fail),
            (urls[1].clone(), Behavior::Fail),
            (urls[2].clone(), Behavior::Size(32, 32, Duration::from_millis(200))),
            (urls[3].clone(), Behavior::Size(64, 64, Duration::ZERO)),
        ]);

        let resolved = resolve_icon(&loader, IconCascade::new(urls.clone(), fallback_icon("Example"))).await;

        assert_eq!(
            resolved,
            ResolvedIcon::Source {
                index: 2,
                url: urls[2].clone()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_source_falls_back_after_timeout() {
        let urls = sources(1);
        let loader = ScriptedLoader::new([(urls[0].clone(), Behavior::Silent)]);
        let started = Instant::now();

        let resolved = resolve_icon(&loader, IconCascade::new(urls, fallback_icon("Example"))).await;

        assert_eq!(resolved, ResolvedIcon::Fallback(fallback_icon("Example")));
        assert!(started.elapsed() >= LOAD_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_load_loses_to_timer() {
        let urls = sources(2);
        let loader = ScriptedLoader::new([
            (urls[0].clone(), Behavior::Size(64, 64, Duration::from_millis(2000))),
            (urls[1].clone(), Behavior::Size(48, 48, Duration::from_millis(100))),
        ]);
        let started = Instant::now();

        let resolved = resolve_icon(&loader, IconCascade::new(urls.clone(), fallback_icon("Example"))).await;

        assert_eq!(
            resolved,
            ResolvedIcon::Source {
                index: 1,
                url: urls[1].clone()
            }
        );
        assert!(started.elapsed() >= LOAD_TIMEOUT + Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tiny_icons_exhaust_to_fallback() {
        let urls = sources(2);
        let loader = ScriptedLoader::new([
            (urls[0].clone(), Behavior::Size(16, 16, Duration::ZERO)),
            (urls[1].clone(), Behavior::Size(1, 1, Duration::ZERO)),
        ]);

        let resolved = resolve_icon(&loader, IconCascade::new(urls, fallback_icon("tiny"))).await;

        assert_eq!(resolved, ResolvedIcon::Fallback(fallback_icon("tiny")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_icons_per_link() {
        let link = |id: &str, title: &str, url: &str, custom: Option<&str>| Link {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            description: None,
            custom_icon: custom.map(str::to_string),
            category_id: "c1".to_string(),
            clicks: 0,
            created_at: None,
        };
        let links = vec![
            link("a", "Alpha", "https://alpha.example", None),
            link("b", "Beta", "https://beta.example", Some("https://cdn.example/beta.png")),
            link("c", "Gamma", "not a url", None),
        ];
        let loader = Arc::new(ScriptedLoader::new([
            (
                "https://alpha.example/favicon.png".to_string(),
                Behavior::Size(32, 32, Duration::ZERO),
            ),
            (
                "https://cdn.example/beta.png".to_string(),
                Behavior::Size(128, 128, Duration::ZERO),
            ),
        ]));

        let resolved = resolve_icons(loader, &links).await;

        assert_eq!(resolved.len(), 3);
        assert_eq!(
            resolved["a"],
            ResolvedIcon::Source {
                index: 1,
                url: "https://alpha.example/favicon.png".to_string()
            }
        );
        assert_eq!(
            resolved["b"],
            ResolvedIcon::Source {
                index: 0,
                url: "https://cdn.example/beta.png".to_string()
            }
        );
        assert_eq!(resolved["c"], ResolvedIcon::Fallback(fallback_icon("Gamma")));
    }
}
