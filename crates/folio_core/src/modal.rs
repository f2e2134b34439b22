//! Recommendation confirmation modal.
//!
//! # Invariants
//! - `is-open` present ⇔ `aria-hidden="false"` after any open/close call.
//! - Closing an already closed (or missing) modal changes nothing.

use crate::events::{Event, EventType, Handler, ListenerGroup, Scope};
use crate::page::Page;
use log::{debug, warn};

pub const MODAL_ID: &str = "recommendationModal";
pub const MODAL_MESSAGE_ID: &str = "recommendationModalMessage";
pub const MODAL_CLOSE_ID: &str = "recommendationModalClose";
pub const OPEN_CLASS: &str = "is-open";
pub const DISMISS_SELECTOR: &str = "#recommendationModalClose, [data-modal-close=\"true\"]";
pub const ESCAPE_KEY: &str = "Escape";

/// Installs the delegated dismissal listeners on the document. They work for
/// modal markup inserted at any time.
pub(crate) fn wire(page: &mut Page, group: ListenerGroup) {
    match crate::dom::selector::SelectorList::parse(DISMISS_SELECTOR) {
        Ok(selector) => page.listeners.add(
            group,
            EventType::Click,
            Scope::Delegated(selector),
            Handler::ModalDismissClick,
        ),
        Err(err) => warn!("event=modal_wire module=modal status=error reason={err}"),
    }
    page.listeners
        .add(group, EventType::KeyDown, Scope::Document, Handler::ModalDismissKey);
}

pub fn is_open(page: &Page) -> bool {
    page.doc
        .get_element_by_id(MODAL_ID)
        .is_some_and(|modal| page.doc.has_class(modal, OPEN_CLASS))
}

/// Shows the modal with `message` and focuses its close control.
pub fn open(page: &mut Page, message: &str) {
    let Some(modal) = page.doc.get_element_by_id(MODAL_ID) else {
        return;
    };
    if let Some(slot) = page.doc.get_element_by_id(MODAL_MESSAGE_ID) {
        page.doc.set_text_content(slot, message);
    }
    page.doc.add_class(modal, OPEN_CLASS);
    page.doc.set_attr(modal, "aria-hidden", "false");
    if let Some(close) = page.doc.get_element_by_id(MODAL_CLOSE_ID) {
        page.doc.focus(close);
    }
    debug!("event=modal_open module=modal");
}

pub fn close(page: &mut Page) {
    let Some(modal) = page.doc.get_element_by_id(MODAL_ID) else {
        return;
    };
    if !page.doc.has_class(modal, OPEN_CLASS) {
        return;
    }
    page.doc.remove_class(modal, OPEN_CLASS);
    page.doc.set_attr(modal, "aria-hidden", "true");
    debug!("event=modal_close module=modal");
}

pub(crate) fn dismiss_on_click(page: &mut Page) {
    close(page);
}

pub(crate) fn dismiss_on_key(page: &mut Page, event: &Event) {
    if event.key() == Some(ESCAPE_KEY) {
        close(page);
    }
}
