//! Rendered-page handle.
//!
//! # Responsibility
//! - Own the document, viewport, virtual clock, listener table, reveal
//!   observer and toast table of one page session.
//! - Route dispatched events and fired timers to interaction handlers.
//!
//! # Invariants
//! - All handler side effects go through the owned document.
//! - `viewport.scroll_y` always lies within `[0, max_scroll()]`.
//! - Intersections are re-evaluated after every dispatch and every fired
//!   timer, so observers see each settled state.

use crate::config::InteractionConfig;
use crate::dom::selector::SelectorList;
use crate::dom::{Document, NodeId};
use crate::events::{DispatchTable, Event, EventType, Handler, ListenerGroup, Matched};
use crate::notify::Toast;
use crate::observer::IntersectionObserver;
use crate::reveal::SkillBarState;
use crate::timers::{TimerQueue, TimerTask};
use crate::{forms, hover, modal, nav, notify, reveal, scroll};
use log::{debug, trace};
use std::collections::BTreeMap;

/// Programmatic scroll requests kept for inspection; older ones are dropped.
pub const SCROLL_LOG_CAPACITY: usize = 256;

/// Visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Current vertical scroll offset.
    pub scroll_y: f64,
    /// Inner height of the window.
    pub height: f64,
}

/// How a programmatic scroll moves the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Programmatic scroll issued by a handler or a default action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Offset the caller asked for.
    pub top: f64,
    /// Offset actually applied after clamping.
    pub applied: f64,
    pub behavior: ScrollBehavior,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of listeners that ran.
    pub handled: usize,
    pub default_prevented: bool,
}

/// One live page session.
#[derive(Debug, Clone)]
pub struct Page {
    pub(crate) doc: Document,
    pub(crate) viewport: Viewport,
    pub(crate) timers: TimerQueue,
    pub(crate) listeners: DispatchTable,
    pub(crate) observer: Option<IntersectionObserver>,
    pub(crate) toasts: Vec<Toast>,
    pub(crate) skill_bars: BTreeMap<NodeId, SkillBarState>,
    pub(crate) config: InteractionConfig,
    /// Listener group of the live installation, if any.
    pub(crate) installation: Option<ListenerGroup>,
    scroll_log: Vec<ScrollRequest>,
}

impl Page {
    /// Wraps an already-built document in a page session.
    pub fn new(doc: Document, viewport_height: f64) -> Self {
        Self {
            doc,
            viewport: Viewport {
                scroll_y: 0.0,
                height: viewport_height.max(0.0),
            },
            timers: TimerQueue::new(),
            listeners: DispatchTable::new(),
            observer: None,
            toasts: Vec::new(),
            skill_bars: BTreeMap::new(),
            config: InteractionConfig::default(),
            installation: None,
            scroll_log: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable document access for callers simulating markup changes.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_len()
    }

    /// Whether interactions are currently installed on this page.
    pub fn is_installed(&self) -> bool {
        self.installation.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Programmatic scroll requests, oldest first. Only the latest
    /// [`SCROLL_LOG_CAPACITY`] are retained.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_log
    }

    /// Toasts shown in this session, oldest first. Every live toast is
    /// kept; removed ones are pruned beyond
    /// [`notify::REMOVED_TOAST_RETENTION`].
    pub fn notifications(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn skill_bar_state(&self, bar: NodeId) -> SkillBarState {
        self.skill_bars.get(&bar).copied().unwrap_or_default()
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.doc.scroll_height() - self.viewport.height).max(0.0)
    }

    /// Convenience lookup by selector string.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.doc.query_str(selector)
    }

    /// Dispatches `event` to every matching listener, then runs the default
    /// action unless a listener prevented it.
    pub fn dispatch(&mut self, mut event: Event) -> DispatchOutcome {
        let matched = self.listeners.resolve(&self.doc, &event);
        trace!(
            "event=dispatch module=page type={} listeners={}",
            event.event_type().as_str(),
            matched.len()
        );
        for item in &matched {
            self.run_handler(*item, &mut event);
        }
        if !event.default_prevented() {
            self.default_action(&event);
        }
        self.flush_intersections();
        DispatchOutcome {
            handled: matched.len(),
            default_prevented: event.default_prevented(),
        }
    }

    pub fn click(&mut self, target: NodeId) -> DispatchOutcome {
        self.dispatch(Event::click(target))
    }

    pub fn submit(&mut self, form: NodeId) -> DispatchOutcome {
        self.dispatch(Event::submit(form))
    }

    pub fn key_down(&mut self, key: &str) -> DispatchOutcome {
        self.dispatch(Event::key_down(key))
    }

    pub fn mouse_enter(&mut self, target: NodeId) -> DispatchOutcome {
        self.dispatch(Event::mouse_enter(target))
    }

    pub fn mouse_leave(&mut self, target: NodeId) -> DispatchOutcome {
        self.dispatch(Event::mouse_leave(target))
    }

    /// Signals that the initial markup is fully parsed.
    pub fn content_loaded(&mut self) -> DispatchOutcome {
        self.dispatch(Event::content_loaded())
    }

    /// Types `value` into a form field.
    pub fn set_value(&mut self, field: NodeId, value: &str) {
        self.doc.set_value(field, value);
    }

    /// User-driven scroll: moves the viewport and fires `scroll` when the
    /// offset actually changes.
    pub fn scroll_by_user(&mut self, offset: f64) {
        let applied = self.clamp_scroll(offset);
        self.apply_scroll(applied);
    }

    /// Programmatic scroll (`window.scrollTo`). The request is recorded even
    /// when the clamped offset equals the current one.
    ///
    /// Smooth scrolling settles immediately on the final offset and emits a
    /// single `scroll` event.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let applied = self.clamp_scroll(top);
        if self.scroll_log.len() == SCROLL_LOG_CAPACITY {
            self.scroll_log.remove(0);
        }
        self.scroll_log.push(ScrollRequest {
            top,
            applied,
            behavior,
        });
        debug!(
            "event=scroll_to module=page top={} applied={} smooth={}",
            top,
            applied,
            behavior == ScrollBehavior::Smooth
        );
        self.apply_scroll(applied);
    }

    fn clamp_scroll(&self, offset: f64) -> f64 {
        if offset.is_nan() {
            return self.viewport.scroll_y;
        }
        offset.clamp(0.0, self.max_scroll())
    }

    fn apply_scroll(&mut self, applied: f64) {
        if applied == self.viewport.scroll_y {
            return;
        }
        self.viewport.scroll_y = applied;
        self.dispatch(Event::scroll());
    }

    /// Advances the virtual clock by `ms`, firing every timer that comes due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now_ms().saturating_add(ms);
        while let Some(task) = self.timers.pop_due(until) {
            self.run_timer(task);
            self.flush_intersections();
        }
        self.timers.settle(until);
    }

    /// Fires every pending timer, including ones scheduled while draining.
    pub fn run_until_idle(&mut self) {
        while let Some(due) = self.timers.next_due() {
            let delta = due.saturating_sub(self.timers.now_ms());
            self.advance(delta);
        }
    }

    fn run_handler(&mut self, item: Matched, event: &mut Event) {
        let current = item.current_target;
        match item.handler {
            Handler::ToggleMenu => nav::toggle_menu(self),
            Handler::CloseMenu => nav::close_menu(self),
            Handler::HighlightSection => nav::highlight_active_section(self),
            Handler::NavbarState => scroll::update_navbar(self),
            Handler::ScrollTopVisibility => scroll::update_scroll_top_button(self),
            Handler::ScrollToTop => scroll::scroll_to_top(self),
            Handler::SmoothAnchor => scroll::smooth_anchor(self, current, event),
            Handler::ContactSubmit => forms::submit_contact(self, current, event),
            Handler::RecommendationSubmit => forms::submit_recommendation(self, current, event),
            Handler::ModalDismissClick => modal::dismiss_on_click(self),
            Handler::ModalDismissKey => modal::dismiss_on_key(self, event),
            Handler::RevealOnLoad => reveal::on_content_loaded(self),
            Handler::CardHoverEnter => hover::lift(self, current),
            Handler::CardHoverLeave => hover::settle(self, current),
        }
    }

    fn run_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::SkillWidth { bar, width } => reveal::apply_width(self, bar, &width),
            TimerTask::Toast { id, phase } => notify::enter_phase(self, id, phase),
        }
    }

    /// Built-in behavior for events nobody prevented.
    fn default_action(&mut self, event: &Event) {
        match (event.event_type(), event.target()) {
            (EventType::Click, Some(target)) => self.follow_fragment_link(target),
            (EventType::Submit, Some(form)) => {
                debug!(
                    "event=form_native_submit module=page form={}",
                    form.index()
                );
            }
            _ => {}
        }
    }

    /// Jumps to a same-page fragment target the way a plain link does.
    fn follow_fragment_link(&mut self, target: NodeId) {
        let Ok(links) = SelectorList::parse("a[href]") else {
            return;
        };
        let Some(link) = self.doc.closest(target, &links) else {
            return;
        };
        let Some(fragment) = self.doc.attr(link, "href").and_then(|h| h.strip_prefix('#'))
        else {
            return;
        };
        let top = if fragment.is_empty() {
            Some(0.0)
        } else {
            self.doc
                .get_element_by_id(fragment)
                .map(|node| self.doc.offset_top(node))
        };
        if let Some(top) = top {
            self.scroll_to(top, ScrollBehavior::Instant);
        }
    }

    fn flush_intersections(&mut self) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        let entries =
            observer.take_records(&self.doc, self.viewport.scroll_y, self.viewport.height);
        for entry in entries {
            reveal::on_intersection(self, entry);
        }
    }
}
