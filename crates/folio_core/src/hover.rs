//! Project-card hover lift.

use crate::dom::NodeId;
use crate::events::{EventType, Handler, ListenerGroup, Scope};
use crate::page::Page;

pub const PROJECT_CARD_SELECTOR: &str = ".project-card";
pub const LIFTED_TRANSFORM: &str = "translateY(-15px) scale(1.02)";
pub const RESTING_TRANSFORM: &str = "translateY(0) scale(1)";

pub(crate) fn wire(page: &mut Page, group: ListenerGroup) {
    for card in page.doc.query_all_str(PROJECT_CARD_SELECTOR) {
        page.listeners.add(
            group,
            EventType::MouseEnter,
            Scope::Element(card),
            Handler::CardHoverEnter,
        );
        page.listeners.add(
            group,
            EventType::MouseLeave,
            Scope::Element(card),
            Handler::CardHoverLeave,
        );
    }
}

pub(crate) fn lift(page: &mut Page, card: Option<NodeId>) {
    if let Some(card) = card {
        page.doc.set_style(card, "transform", LIFTED_TRANSFORM);
    }
}

pub(crate) fn settle(page: &mut Page, card: Option<NodeId>) {
    if let Some(card) = card {
        page.doc.set_style(card, "transform", RESTING_TRANSFORM);
    }
}
