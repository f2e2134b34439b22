//! Reveal and skill-progress animator.
//!
//! # Responsibility
//! - Mark content blocks `loading` at content-loaded and `loaded` once they
//!   scroll into the observer root.
//! - Copy each visible skill bar's `data-progress` into its width after a
//!   fixed delay.
//!
//! # Invariants
//! - `loaded` is only ever added, never removed.
//! - A bar's width is only written by a fired timer, never synchronously.

use crate::dom::NodeId;
use crate::events::{EventType, Handler, ListenerGroup, Scope};
use crate::observer::{IntersectionEntry, IntersectionObserver, ObserverOptions};
use crate::page::Page;
use crate::timers::TimerTask;
use log::debug;

pub const REVEAL_SELECTOR: &str = ".project-card, .testimonial-card, .stat-item, .skill-category";
pub const SKILL_BAR_SELECTOR: &str = ".skill-progress";
pub const SKILLS_GRID_CLASS: &str = "skills-grid";
pub const PROGRESS_ATTR: &str = "data-progress";
pub const LOADING_CLASS: &str = "loading";
pub const LOADED_CLASS: &str = "loaded";

/// Per-bar animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillBarState {
    /// Never seen on screen.
    #[default]
    Idle,
    /// Width write pending on the timer queue.
    Scheduled,
    /// Width written at least once.
    Animated,
}

pub(crate) fn wire(page: &mut Page, group: ListenerGroup) {
    page.observer = Some(IntersectionObserver::new(ObserverOptions {
        threshold: page.config.reveal_threshold,
        root_margin_bottom: page.config.reveal_root_margin_bottom,
    }));
    page.listeners.add(
        group,
        EventType::ContentLoaded,
        Scope::Document,
        Handler::RevealOnLoad,
    );
}

/// Marks reveal targets `loading`, observes them and animates bars that are
/// already on screen (the observer only reports transitions).
pub fn on_content_loaded(page: &mut Page) {
    let targets = page.doc.query_all_str(REVEAL_SELECTOR);
    for target in &targets {
        page.doc.add_class(*target, LOADING_CLASS);
    }
    if let Some(observer) = page.observer.as_mut() {
        for target in &targets {
            observer.observe(*target);
        }
    }
    debug!(
        "event=reveal_observe module=reveal targets={}",
        targets.len()
    );
    animate_skills(page);
}

pub fn on_intersection(page: &mut Page, entry: IntersectionEntry) {
    if !entry.is_intersecting {
        return;
    }
    page.doc.add_class(entry.target, LOADED_CLASS);
    if page.doc.has_class(entry.target, SKILLS_GRID_CLASS) {
        animate_skills(page);
    }
}

/// Schedules a width write for every skill bar overlapping the viewport.
/// Returns how many writes were scheduled.
pub fn animate_skills(page: &mut Page) -> usize {
    let mut scheduled = 0;
    for bar in page.doc.query_all_str(SKILL_BAR_SELECTOR) {
        let rect = page.doc.bounding_rect(bar, page.viewport.scroll_y);
        if !(rect.top < page.viewport.height && rect.bottom > 0.0) {
            continue;
        }
        // A missing or non-numeric value would be an invalid width; skip it.
        let Some(progress) = page.doc.attr(bar, PROGRESS_ATTR).and_then(parse_progress) else {
            continue;
        };
        let width = format!("{progress}%");
        page.timers.schedule(
            page.config.skill_animation_delay_ms,
            TimerTask::SkillWidth { bar, width },
        );
        if page.skill_bar_state(bar) == SkillBarState::Idle {
            page.skill_bars.insert(bar, SkillBarState::Scheduled);
        }
        scheduled += 1;
    }
    scheduled
}

fn parse_progress(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let value: f64 = trimmed.parse().ok()?;
    (value.is_finite() && value >= 0.0).then(|| trimmed.to_string())
}

pub(crate) fn apply_width(page: &mut Page, bar: NodeId, width: &str) {
    page.doc.set_style(bar, "width", width);
    page.skill_bars.insert(bar, SkillBarState::Animated);
}
