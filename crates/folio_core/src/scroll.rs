//! Scroll effects: navbar state, scroll-to-top control and smooth anchors.

use crate::dom::selector::SelectorList;
use crate::dom::NodeId;
use crate::events::{Event, EventType, Handler, ListenerGroup, Scope};
use crate::page::{Page, ScrollBehavior};
use log::debug;

pub const NAVBAR_SELECTOR: &str = ".navbar";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const SCROLL_TOP_ID: &str = "scrollTopBtn";
pub const SHOW_CLASS: &str = "show";
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

pub(crate) fn wire(page: &mut Page, group: ListenerGroup) {
    page.listeners
        .add(group, EventType::Scroll, Scope::Document, Handler::NavbarState);

    for anchor in page.doc.query_all_str(ANCHOR_SELECTOR) {
        page.listeners.add(
            group,
            EventType::Click,
            Scope::Element(anchor),
            Handler::SmoothAnchor,
        );
    }

    if let Some(button) = page.doc.get_element_by_id(SCROLL_TOP_ID) {
        page.listeners.add(
            group,
            EventType::Scroll,
            Scope::Document,
            Handler::ScrollTopVisibility,
        );
        page.listeners.add(
            group,
            EventType::Click,
            Scope::Element(button),
            Handler::ScrollToTop,
        );
    }
}

/// `scrolled` on the navbar is a pure function of the offset.
pub fn update_navbar(page: &mut Page) {
    let Some(navbar) = page.doc.query_str(NAVBAR_SELECTOR) else {
        return;
    };
    if page.viewport.scroll_y > page.config.navbar_scrolled_offset {
        page.doc.add_class(navbar, SCROLLED_CLASS);
    } else {
        page.doc.remove_class(navbar, SCROLLED_CLASS);
    }
}

pub fn update_scroll_top_button(page: &mut Page) {
    let Some(button) = page.doc.get_element_by_id(SCROLL_TOP_ID) else {
        return;
    };
    if page.viewport.scroll_y > page.config.scroll_top_offset {
        page.doc.add_class(button, SHOW_CLASS);
    } else {
        page.doc.remove_class(button, SHOW_CLASS);
    }
}

pub fn scroll_to_top(page: &mut Page) {
    page.scroll_to(0.0, ScrollBehavior::Smooth);
}

/// Offset that puts `target` just below the navbar.
pub fn anchor_offset(page: &Page, target: NodeId) -> f64 {
    let nav_height = page
        .doc
        .query_str(NAVBAR_SELECTOR)
        .map(|navbar| page.doc.offset_height(navbar))
        .unwrap_or(0.0);
    page.doc.offset_top(target) - nav_height - page.config.anchor_margin
}

/// Replaces the default fragment jump with a smooth scroll.
///
/// When the fragment names no element the jump is still suppressed and
/// nothing scrolls.
pub fn smooth_anchor(page: &mut Page, anchor: Option<NodeId>, event: &mut Event) {
    event.prevent_default();
    let Some(anchor) = anchor else {
        return;
    };
    let Some(href) = page.doc.attr(anchor, "href").map(str::to_string) else {
        return;
    };
    let target = SelectorList::parse(&href)
        .ok()
        .and_then(|selector| page.doc.query(&selector));
    let Some(target) = target else {
        debug!("event=anchor_target_missing module=scroll href_len={}", href.len());
        return;
    };
    let top = anchor_offset(page, target);
    page.scroll_to(top, ScrollBehavior::Smooth);
}
