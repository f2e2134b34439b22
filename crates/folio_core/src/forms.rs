//! Contact and recommendation form handlers.
//!
//! # Responsibility
//! - Intercept both forms' submissions; nothing is ever transmitted.
//! - Turn a valid recommendation into a testimonial card on the page.
//!
//! # Invariants
//! - A blank recommendation message leaves the page untouched apart from
//!   the error toast.
//! - User text reaches card markup only through `escape_html`.

use crate::dom::fragment::escape_html;
use crate::dom::NodeId;
use crate::events::{Event, EventType, Handler, ListenerGroup, Scope};
use crate::modal;
use crate::notify::{show_notification, NotificationKind};
use crate::page::Page;
use log::{debug, warn};
use std::collections::BTreeMap;

pub const CONTACT_FORM_ID: &str = "contactForm";
pub const RECOMMENDATION_FORM_ID: &str = "recommendationForm";
pub const REC_NAME_ID: &str = "recName";
pub const REC_MESSAGE_ID: &str = "recMessage";
pub const TESTIMONIALS_GRID_SELECTOR: &str = ".testimonials-grid";
pub const TESTIMONIAL_CARD_CLASS: &str = "testimonial-card";

pub const CONTACT_SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const EMPTY_MESSAGE_ERROR: &str = "Please enter a message.";
pub const RECOMMENDATION_THANKS: &str = "Thank you for submitting a recommendation!";
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Named field values collected from a form.
pub type FormData = BTreeMap<String, String>;

pub(crate) fn wire(page: &mut Page, group: ListenerGroup) {
    if let Some(form) = page.doc.get_element_by_id(CONTACT_FORM_ID) {
        page.listeners.add(
            group,
            EventType::Submit,
            Scope::Element(form),
            Handler::ContactSubmit,
        );
    }
    if let Some(form) = page.doc.get_element_by_id(RECOMMENDATION_FORM_ID) {
        page.listeners.add(
            group,
            EventType::Submit,
            Scope::Element(form),
            Handler::RecommendationSubmit,
        );
    }
}

/// Collects `name → value` for every named field under `form`.
/// Later fields with a repeated name win.
pub fn collect_form_data(page: &Page, form: NodeId) -> FormData {
    page.doc
        .form_fields(form)
        .into_iter()
        .filter_map(|field| {
            let name = page.doc.attr(field, "name")?;
            if name.is_empty() {
                return None;
            }
            let value = page.doc.value(field).unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

pub(crate) fn submit_contact(page: &mut Page, form: Option<NodeId>, event: &mut Event) {
    event.prevent_default();
    let Some(form) = form else {
        return;
    };
    let data = collect_form_data(page, form);
    // Values stay local: only the field count is logged.
    debug!("event=contact_submit module=forms fields={}", data.len());
    show_notification(page, CONTACT_SUCCESS_MESSAGE, NotificationKind::Success);
    page.doc.reset_form(form);
}

/// Validated recommendation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub author: String,
    pub message: String,
}

impl Recommendation {
    /// Trims both fields; a blank author becomes `Anonymous`, a blank
    /// message is rejected.
    pub fn from_input(name: Option<&str>, message: Option<&str>) -> Option<Self> {
        let message = message.unwrap_or_default().trim();
        if message.is_empty() {
            return None;
        }
        let author = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS_AUTHOR,
        };
        Some(Self {
            author: author.to_string(),
            message: message.to_string(),
        })
    }

    /// Card body markup with both fields escaped.
    pub fn card_markup(&self) -> String {
        format!(
            r#"
                <div class="testimonial-content">
                    <p>"{message}"</p>
                </div>
                <div class="testimonial-author">
                    <div class="author-info">
                        <h4>{author}</h4>
                        <p>Recommendation</p>
                    </div>
                </div>
            "#,
            message = escape_html(&self.message),
            author = escape_html(&self.author),
        )
    }
}

pub(crate) fn submit_recommendation(page: &mut Page, form: Option<NodeId>, event: &mut Event) {
    event.prevent_default();

    let name = page
        .doc
        .get_element_by_id(REC_NAME_ID)
        .and_then(|input| page.doc.value(input));
    let message = page
        .doc
        .get_element_by_id(REC_MESSAGE_ID)
        .and_then(|input| page.doc.value(input));
    let Some(recommendation) = Recommendation::from_input(name, message) else {
        show_notification(page, EMPTY_MESSAGE_ERROR, NotificationKind::Error);
        return;
    };

    if let Some(grid) = page.doc.query_str(TESTIMONIALS_GRID_SELECTOR) {
        append_testimonial(page, grid, &recommendation);
    }

    modal::open(page, RECOMMENDATION_THANKS);
    if let Some(form) = form {
        page.doc.reset_form(form);
    }
}

/// Builds a testimonial card under `grid`. Returns the card node.
pub fn append_testimonial(
    page: &mut Page,
    grid: NodeId,
    recommendation: &Recommendation,
) -> Option<NodeId> {
    let card = page.doc.create_element("div");
    page.doc.set_class_name(card, TESTIMONIAL_CARD_CLASS);
    if let Err(err) = page.doc.set_inner_html(card, &recommendation.card_markup()) {
        warn!("event=testimonial_render module=forms status=error reason={err}");
        return None;
    }
    page.doc.append_child(grid, card);
    debug!("event=testimonial_added module=forms");
    Some(card)
}
