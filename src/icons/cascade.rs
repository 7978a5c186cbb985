use std::time::Duration;

use serde::Serialize;

use super::{fallback_icon, icon_sources, FallbackIcon};
use crate::models::Link;

/// How long one source gets to produce an image.
pub const LOAD_TIMEOUT: Duration = Duration::from_millis(1500);

/// Images no larger than this on both edges are treated as blank placeholders.
pub const MIN_ICON_EDGE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    /// Waiting on the source at this index
    Loading(usize),
    /// Showing the source at this index
    Success(usize),
    /// Showing the generated tile
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Side effects requested by the cascade. The caller performs them and feeds the
/// outcomes back through `on_load`, `on_error` and `on_timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load { index: usize, url: String },
    ArmTimer { timer: TimerId, after: Duration },
    CancelTimer(TimerId),
    ShowFallback(FallbackIcon),
}

/// Icon selection for a single link card.
///
/// At most one timer is outstanding at any time. Events for a source that is no
/// longer being loaded, and expiries of timers that were already cancelled, are
/// ignored. Nothing is retried.
#[derive(Debug)]
pub struct IconCascade {
    sources: Vec<String>,
    fallback: FallbackIcon,
    state: CascadeState,
    timer: Option<TimerId>,
    timers_issued: u64,
    started: bool,
    torn_down: bool,
}

impl IconCascade {
    pub fn new(sources: Vec<String>, fallback: FallbackIcon) -> Self {
        let state = if sources.is_empty() {
            CascadeState::Fallback
        } else {
            CascadeState::Loading(0)
        };
        Self {
            sources,
            fallback,
            state,
            timer: None,
            timers_issued: 0,
            started: false,
            torn_down: false,
        }
    }

    pub fn for_link(link: &Link) -> Self {
        Self::new(icon_sources(link), fallback_icon(&link.title))
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn fallback(&self) -> &FallbackIcon {
        &self.fallback
    }

    /// Request the first source, or show the fallback right away when there is none.
    /// Only the first call does anything.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started || self.torn_down {
            return Vec::new();
        }
        self.started = true;

        let mut effects = Vec::new();
        match self.state {
            CascadeState::Loading(index) => self.request(index, &mut effects),
            _ => effects.push(Effect::ShowFallback(self.fallback.clone())),
        }
        effects
    }

    /// Source `index` finished loading with the given intrinsic size.
    pub fn on_load(&mut self, index: usize, width: u32, height: u32) -> Vec<Effect> {
        if !self.is_current(index) {
            tracing::warn!("Ignoring late load of icon source {}", index);
            return Vec::new();
        }

        if width <= MIN_ICON_EDGE && height <= MIN_ICON_EDGE {
            tracing::debug!(
                "Icon source {} is {}x{}, trying the next one",
                index,
                width,
                height
            );
            return self.advance(index);
        }

        let mut effects = Vec::new();
        self.cancel_timer(&mut effects);
        self.state = CascadeState::Success(index);
        effects
    }

    /// Source `index` failed to load.
    pub fn on_error(&mut self, index: usize) -> Vec<Effect> {
        if !self.is_current(index) {
            tracing::warn!("Ignoring late error from icon source {}", index);
            return Vec::new();
        }
        self.advance(index)
    }

    /// `timer` expired.
    pub fn on_timeout(&mut self, timer: TimerId) -> Vec<Effect> {
        if self.torn_down || self.timer != Some(timer) {
            tracing::warn!("Ignoring stale icon timer {:?}", timer);
            return Vec::new();
        }
        // Fired, so there is nothing left to cancel.
        self.timer = None;

        match self.state {
            CascadeState::Loading(index) => {
                tracing::debug!("Icon source {} timed out", index);
                self.advance(index)
            }
            _ => Vec::new(),
        }
    }

    /// Tear the cascade down, cancelling the pending timer. Later events are ignored.
    pub fn cancel(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.cancel_timer(&mut effects);
        self.torn_down = true;
        effects
    }

    fn is_current(&self, index: usize) -> bool {
        !self.torn_down && self.state == CascadeState::Loading(index)
    }

    fn advance(&mut self, index: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.cancel_timer(&mut effects);

        let next = index + 1;
        if next < self.sources.len() {
            self.state = CascadeState::Loading(next);
            self.request(next, &mut effects);
        } else {
            self.state = CascadeState::Fallback;
            effects.push(Effect::ShowFallback(self.fallback.clone()));
        }
        effects
    }

    fn request(&mut self, index: usize, effects: &mut Vec<Effect>) {
        self.timers_issued += 1;
        let timer = TimerId(self.timers_issued);
        self.timer = Some(timer);

        effects.push(Effect::Load {
            index,
            url: self.sources[index].clone(),
        });
        effects.push(Effect::ArmTimer {
            timer,
            after: LOAD_TIMEOUT,
        });
    }

    fn cancel_timer(&mut self, effects: &mut Vec<Effect>) {
        if let Some(timer) = self.timer.take() {
            effects.push(Effect::CancelTimer(timer));
        }
    }
}

/// Everything a client needs to run the cascade for one link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconPlan {
    pub sources: Vec<String>,
    pub fallback: FallbackIcon,
    pub timeout_ms: u64,
}

impl IconPlan {
    pub fn for_link(link: &Link) -> Self {
        Self {
            sources: icon_sources(link),
            fallback: fallback_icon(&link.title),
            timeout_ms: LOAD_TIMEOUT.as_millis() as u64,
        }
    }
}
