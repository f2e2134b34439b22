mod support;

use folio_core::forms::{collect_form_data, CONTACT_SUCCESS_MESSAGE, EMPTY_MESSAGE_ERROR};
use folio_core::{NotificationKind, ToastPhase};
use support::{by_id, loaded_portfolio};

fn within(page: &folio_core::Page, card: folio_core::NodeId, selector: &str) -> folio_core::NodeId {
    let doc = page.document();
    doc.query_all_str(selector)
        .into_iter()
        .find(|node| doc.is_ancestor(card, *node))
        .unwrap_or_else(|| panic!("card contains {selector}"))
}

fn testimonial_cards(page: &folio_core::Page) -> Vec<folio_core::NodeId> {
    let doc = page.document();
    let grid = doc.query_str(".testimonials-grid").expect("grid exists");
    doc.child_elements(grid)
}

#[test]
fn contact_submit_is_intercepted_and_acknowledged() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "contactForm");
    let name = by_id(&page, "contactName");
    let email = by_id(&page, "contactEmail");
    let message = by_id(&page, "contactMessage");
    page.set_value(name, "Ada");
    page.set_value(email, "ada@example.com");
    page.set_value(message, "Hello there");

    let data = collect_form_data(&page, form);
    assert_eq!(data.len(), 3);
    assert_eq!(data.get("email").map(String::as_str), Some("ada@example.com"));

    let outcome = page.submit(form);

    assert!(outcome.default_prevented);
    let toasts = page.notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Success);
    assert_eq!(toasts[0].message, CONTACT_SUCCESS_MESSAGE);
    for field in [name, email, message] {
        assert_eq!(page.document().value(field), Some(""));
    }
}

#[test]
fn empty_contact_form_still_succeeds() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "contactForm");
    page.submit(form);
    assert_eq!(page.notifications().len(), 1);
    assert_eq!(page.notifications()[0].kind, NotificationKind::Success);
}

#[test]
fn blank_recommendation_only_shows_an_error() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "recommendationForm");
    let name = by_id(&page, "recName");
    let message = by_id(&page, "recMessage");
    page.set_value(name, "Grace");
    page.set_value(message, "   \n ");
    let cards_before = testimonial_cards(&page).len();

    let outcome = page.submit(form);

    assert!(outcome.default_prevented);
    let toasts = page.notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Error);
    assert_eq!(toasts[0].message, EMPTY_MESSAGE_ERROR);
    assert_eq!(testimonial_cards(&page).len(), cards_before);
    assert!(!folio_core::modal::is_open(&page));
    // Inputs are kept so the visitor can fix them.
    assert_eq!(page.document().value(name), Some("Grace"));
}

#[test]
fn recommendation_appends_card_opens_modal_and_resets() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "recommendationForm");
    let name = by_id(&page, "recName");
    let message = by_id(&page, "recMessage");
    page.set_value(name, "  Grace Hopper ");
    page.set_value(message, " Ships working code. ");

    page.submit(form);

    let cards = testimonial_cards(&page);
    assert_eq!(cards.len(), 2);
    let card = *cards.last().expect("new card appended");
    let doc = page.document();
    assert!(doc.has_class(card, "testimonial-card"));
    let author = within(&page, card, "h4");
    assert_eq!(doc.text_content(author), "Grace Hopper");
    let quote = within(&page, card, "p");
    assert_eq!(doc.text_content(quote), "\"Ships working code.\"");

    assert!(folio_core::modal::is_open(&page));
    let modal = by_id(&page, "recommendationModal");
    assert_eq!(page.document().attr(modal, "aria-hidden"), Some("false"));
    let slot = by_id(&page, "recommendationModalMessage");
    assert_eq!(
        page.document().text_content(slot),
        "Thank you for submitting a recommendation!"
    );
    assert_eq!(
        page.document().active_element(),
        Some(by_id(&page, "recommendationModalClose"))
    );
    assert_eq!(page.document().value(name), Some(""));
    assert_eq!(page.document().value(message), Some(""));
    assert!(page.notifications().is_empty());
}

#[test]
fn anonymous_author_when_name_is_blank() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "recommendationForm");
    let message = by_id(&page, "recMessage");
    page.set_value(message, "Great collaborator");

    page.submit(form);

    let card = *testimonial_cards(&page).last().expect("card appended");
    let doc = page.document();
    let author = within(&page, card, "h4");
    assert_eq!(doc.text_content(author), "Anonymous");
}

#[test]
fn markup_in_recommendation_is_rendered_as_text() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "recommendationForm");
    let name = by_id(&page, "recName");
    let message = by_id(&page, "recMessage");
    page.set_value(name, "<img src=x>");
    page.set_value(message, "<script>alert(1)</script>");

    page.submit(form);

    let card = *testimonial_cards(&page).last().expect("card appended");
    let doc = page.document();
    assert!(doc
        .query_all_str("script, img")
        .into_iter()
        .all(|node| !doc.is_ancestor(card, node)));
    let quote = within(&page, card, "p");
    assert_eq!(doc.text_content(quote), "\"<script>alert(1)</script>\"");
    let html = doc.outer_html(card);
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&lt;img src=x&gt;"));
}

#[test]
fn error_toast_for_blank_recommendation_follows_lifecycle() {
    let (mut page, _disposer) = loaded_portfolio();
    let form = by_id(&page, "recommendationForm");
    page.submit(form);
    page.run_until_idle();
    assert_eq!(page.notifications()[0].phase, ToastPhase::Removed);
}
