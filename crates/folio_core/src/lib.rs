//! Headless interaction engine for a single-page portfolio site.
//!
//! A [`Page`] holds the rendered document, viewport and virtual clock;
//! [`install`] wires the navigation, scroll, reveal, form, modal, hover and
//! toast behaviors onto it.

pub mod config;
pub mod dom;
pub mod events;
pub mod fixture;
pub mod forms;
pub mod hover;
pub mod interactions;
pub mod logging;
pub mod modal;
pub mod nav;
pub mod notify;
pub mod observer;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod timers;

pub use config::{ConfigError, InteractionConfig};
pub use dom::fragment::{escape_html, MarkupError};
pub use dom::selector::{SelectorError, SelectorList};
pub use dom::{Document, LayoutBox, NodeId, Rect};
pub use events::{Event, EventType};
pub use fixture::{FixtureError, PageFixture};
pub use forms::{FormData, Recommendation};
pub use interactions::{install, Disposer, InstallError};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use notify::{
    show_notification, NotificationKind, Toast, ToastId, ToastPhase, REMOVED_TOAST_RETENTION,
};
pub use page::{DispatchOutcome, Page, ScrollBehavior, ScrollRequest, Viewport, SCROLL_LOG_CAPACITY};
pub use reveal::SkillBarState;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
