//! Page events and the listener dispatch table.
//!
//! # Responsibility
//! - Describe the events the page reacts to (click, scroll, submit, keydown,
//!   content-loaded, pointer enter/leave).
//! - Keep every installed listener in one table keyed by event type and a
//!   target scope, so delegated and element listeners share one lookup path.
//!
//! # Invariants
//! - Element-scoped listeners run before document-scoped ones, innermost
//!   element first (bubbling order), then in registration order.
//! - Removing a listener group never touches other groups.

use crate::dom::selector::SelectorList;
use crate::dom::{Document, NodeId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Kinds of events the page dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Scroll,
    Submit,
    KeyDown,
    ContentLoaded,
    MouseEnter,
    MouseLeave,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::Submit => "submit",
            Self::KeyDown => "keydown",
            Self::ContentLoaded => "content_loaded",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
        }
    }

    /// Pointer enter/leave do not bubble to ancestors.
    fn bubbles(self) -> bool {
        !matches!(self, Self::MouseEnter | Self::MouseLeave)
    }
}

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: EventType,
    target: Option<NodeId>,
    key: Option<String>,
    default_prevented: bool,
}

impl Event {
    fn new(event_type: EventType, target: Option<NodeId>) -> Self {
        Self {
            event_type,
            target,
            key: None,
            default_prevented: false,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, Some(target))
    }

    pub fn scroll() -> Self {
        Self::new(EventType::Scroll, None)
    }

    pub fn submit(form: NodeId) -> Self {
        Self::new(EventType::Submit, Some(form))
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventType::KeyDown, None)
        }
    }

    pub fn content_loaded() -> Self {
        Self::new(EventType::ContentLoaded, None)
    }

    pub fn mouse_enter(target: NodeId) -> Self {
        Self::new(EventType::MouseEnter, Some(target))
    }

    pub fn mouse_leave(target: NodeId) -> Self {
        Self::new(EventType::MouseLeave, Some(target))
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Interaction routine a listener runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    ToggleMenu,
    CloseMenu,
    NavbarState,
    HighlightSection,
    ScrollTopVisibility,
    ScrollToTop,
    SmoothAnchor,
    ContactSubmit,
    RecommendationSubmit,
    ModalDismissClick,
    ModalDismissKey,
    RevealOnLoad,
    CardHoverEnter,
    CardHoverLeave,
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Fires for events whose target is this element or (when bubbling) inside it.
    Element(NodeId),
    /// Fires for every event of the type (window/document listeners).
    Document,
    /// Document listener that fires only when the target is or sits inside an
    /// element matching the selector.
    Delegated(SelectorList),
}

static NEXT_GROUP: AtomicU64 = AtomicU64::new(1);

/// Identifies the listeners installed together by one `install` call.
/// Ids are unique across every page in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerGroup(pub(crate) u64);

impl ListenerGroup {
    pub(crate) fn allocate() -> Self {
        Self(NEXT_GROUP.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone)]
struct Listener {
    group: ListenerGroup,
    event_type: EventType,
    scope: Scope,
    handler: Handler,
}

/// Listener resolved for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matched {
    pub handler: Handler,
    /// Element the listener is attached to or the delegated match;
    /// `None` for plain document listeners.
    pub current_target: Option<NodeId>,
}

/// Listener table keyed by event type and scope.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    listeners: Vec<Listener>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, group: ListenerGroup, event_type: EventType, scope: Scope, handler: Handler) {
        self.listeners.push(Listener {
            group,
            event_type,
            scope,
            handler,
        });
    }

    /// Removes every listener of `group`; returns how many were removed.
    pub fn remove_group(&mut self, group: ListenerGroup) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.group != group);
        before - self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn count_for(&self, event_type: EventType) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .count()
    }

    /// Resolves listeners for `event` in invocation order.
    pub fn resolve(&self, doc: &Document, event: &Event) -> Vec<Matched> {
        let mut element_hits: Vec<(usize, Matched)> = Vec::new();
        let mut document_hits: Vec<Matched> = Vec::new();
        let path = propagation_path(doc, event);

        for listener in self.listeners.iter().filter(|l| l.event_type == event.event_type) {
            match &listener.scope {
                Scope::Element(node) => {
                    if let Some(depth) = path.iter().position(|p| p == node) {
                        element_hits.push((
                            depth,
                            Matched {
                                handler: listener.handler,
                                current_target: Some(*node),
                            },
                        ));
                    }
                }
                Scope::Document => document_hits.push(Matched {
                    handler: listener.handler,
                    current_target: None,
                }),
                Scope::Delegated(selector) => {
                    let hit = event.target.and_then(|t| doc.closest(t, selector));
                    if let Some(node) = hit {
                        document_hits.push(Matched {
                            handler: listener.handler,
                            current_target: Some(node),
                        });
                    }
                }
            }
        }

        element_hits.sort_by_key(|(depth, _)| *depth);
        element_hits
            .into_iter()
            .map(|(_, matched)| matched)
            .chain(document_hits)
            .collect()
    }
}

/// Target first, then ancestors when the event bubbles.
fn propagation_path(doc: &Document, event: &Event) -> Vec<NodeId> {
    let Some(target) = event.target else {
        return Vec::new();
    };
    let mut path = vec![target];
    if event.event_type.bubbles() {
        let mut cursor = doc.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = doc.parent(node);
        }
    }
    path
}
