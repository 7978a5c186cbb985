//! Favicon resolution for link cards.
//!
//! Each link gets an ordered list of candidate icon URLs ([`icon_sources`]). A
//! per-link [`IconCascade`] walks that list one source at a time, giving each load
//! [`LOAD_TIMEOUT`] to produce a usable image, and settles on a generated
//! [`FallbackIcon`] once every source has failed. The cascade itself is a plain
//! state machine that emits [`Effect`]s; [`resolve_icon`] drives it with tokio
//! timers against an [`IconLoader`].

mod cascade;
mod fallback;
mod resolver;
mod sources;

pub use cascade::{
    CascadeState, Effect, IconCascade, IconPlan, TimerId, LOAD_TIMEOUT, MIN_ICON_EDGE,
};
pub use fallback::{fallback_icon, FallbackIcon, PALETTE};
pub use resolver::{
    resolve_icon, resolve_icons, IconDimensions, IconLoadError, IconLoader, ResolvedIcon,
};
pub use sources::icon_sources;
