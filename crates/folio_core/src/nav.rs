//! Navigation controller: mobile menu toggle and active-section highlight.
//!
//! # Invariants
//! - The `active` marker on `.hamburger` and `.nav-menu` always changes in
//!   lockstep.
//! - Sections are assumed to be in top-to-bottom document order; the last
//!   qualifying section wins.

use crate::events::{EventType, Handler, ListenerGroup, Scope};
use crate::page::Page;
use log::debug;

pub const HAMBURGER_SELECTOR: &str = ".hamburger";
pub const NAV_MENU_SELECTOR: &str = ".nav-menu";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const SECTION_SELECTOR: &str = "section";
pub const ACTIVE_CLASS: &str = "active";

/// Attaches menu and section-highlight listeners.
pub(crate) fn wire(page: &mut Page, group: ListenerGroup) {
    let hamburger = page.doc.query_str(HAMBURGER_SELECTOR);
    let menu = page.doc.query_str(NAV_MENU_SELECTOR);
    if let (Some(hamburger), Some(_)) = (hamburger, menu) {
        page.listeners.add(
            group,
            EventType::Click,
            Scope::Element(hamburger),
            Handler::ToggleMenu,
        );
    }

    for link in page.doc.query_all_str(NAV_LINK_SELECTOR) {
        page.listeners
            .add(group, EventType::Click, Scope::Element(link), Handler::CloseMenu);
    }

    page.listeners
        .add(group, EventType::Scroll, Scope::Document, Handler::HighlightSection);
}

/// Flips the menu open state on both the toggle control and the panel.
pub fn toggle_menu(page: &mut Page) {
    let (Some(hamburger), Some(menu)) = (
        page.doc.query_str(HAMBURGER_SELECTOR),
        page.doc.query_str(NAV_MENU_SELECTOR),
    ) else {
        return;
    };
    let open = page.doc.toggle_class(hamburger, ACTIVE_CLASS);
    if open {
        page.doc.add_class(menu, ACTIVE_CLASS);
    } else {
        page.doc.remove_class(menu, ACTIVE_CLASS);
    }
    debug!("event=menu_toggle module=nav open={open}");
}

/// Clears the menu open state. Idempotent.
pub fn close_menu(page: &mut Page) {
    if let Some(hamburger) = page.doc.query_str(HAMBURGER_SELECTOR) {
        page.doc.remove_class(hamburger, ACTIVE_CLASS);
    }
    if let Some(menu) = page.doc.query_str(NAV_MENU_SELECTOR) {
        page.doc.remove_class(menu, ACTIVE_CLASS);
    }
}

pub fn is_menu_open(page: &Page) -> bool {
    page.doc
        .query_str(NAV_MENU_SELECTOR)
        .is_some_and(|menu| page.doc.has_class(menu, ACTIVE_CLASS))
}

/// Index of the current section: the last one whose `top - lookahead` is at
/// or above `scroll_y`.
pub fn resolve_active_section(tops: &[f64], scroll_y: f64, lookahead: f64) -> Option<usize> {
    let mut current = None;
    for (index, top) in tops.iter().enumerate() {
        if scroll_y >= top - lookahead {
            current = Some(index);
        }
    }
    current
}

/// Moves the `active` marker to the nav link of the current section.
pub fn highlight_active_section(page: &mut Page) {
    let sections = page.doc.query_all_str(SECTION_SELECTOR);
    let tops: Vec<f64> = sections.iter().map(|s| page.doc.offset_top(*s)).collect();
    let current_id = resolve_active_section(
        &tops,
        page.viewport.scroll_y,
        page.config.section_lookahead,
    )
    .and_then(|index| page.doc.id(sections[index]))
    .map(str::to_string);

    for link in page.doc.query_all_str(NAV_LINK_SELECTOR) {
        page.doc.remove_class(link, ACTIVE_CLASS);
        let Some(current) = current_id.as_deref() else {
            continue;
        };
        let fragment = page
            .doc
            .attr(link, "href")
            .and_then(|href| href.get(1..))
            .unwrap_or_default();
        if fragment == current {
            page.doc.add_class(link, ACTIVE_CLASS);
        }
    }
}
