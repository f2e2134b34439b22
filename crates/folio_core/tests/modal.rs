mod support;

use folio_core::modal;
use support::{by_id, loaded_portfolio};

fn opened_portfolio() -> (folio_core::Page, folio_core::Disposer) {
    let (mut page, disposer) = loaded_portfolio();
    modal::open(&mut page, "Thanks!");
    assert!(modal::is_open(&page));
    (page, disposer)
}

fn aria_hidden(page: &folio_core::Page) -> Option<String> {
    let modal = by_id(page, "recommendationModal");
    page.document().attr(modal, "aria-hidden").map(str::to_string)
}

#[test]
fn open_sets_message_marker_and_focus() {
    let (page, _disposer) = opened_portfolio();
    assert_eq!(aria_hidden(&page).as_deref(), Some("false"));
    let slot = by_id(&page, "recommendationModalMessage");
    assert_eq!(page.document().text_content(slot), "Thanks!");
    assert_eq!(
        page.document().active_element(),
        Some(by_id(&page, "recommendationModalClose"))
    );
}

#[test]
fn escape_key_closes_the_modal() {
    let (mut page, _disposer) = opened_portfolio();
    page.key_down("Escape");
    assert!(!modal::is_open(&page));
    assert_eq!(aria_hidden(&page).as_deref(), Some("true"));
}

#[test]
fn other_keys_leave_the_modal_open() {
    let (mut page, _disposer) = opened_portfolio();
    for key in ["Enter", "Esc", "escape", " "] {
        page.key_down(key);
        assert!(modal::is_open(&page), "{key:?} must not close the modal");
    }
}

#[test]
fn overlay_click_closes_the_modal() {
    let (mut page, _disposer) = opened_portfolio();
    let overlay = by_id(&page, "modalOverlay");
    page.click(overlay);
    assert!(!modal::is_open(&page));
}

#[test]
fn click_on_close_button_descendant_closes_the_modal() {
    let (mut page, _disposer) = opened_portfolio();
    let icon = by_id(&page, "modalCloseIcon");
    page.click(icon);
    assert!(!modal::is_open(&page));
    assert_eq!(aria_hidden(&page).as_deref(), Some("true"));
}

#[test]
fn click_inside_dialog_keeps_the_modal_open() {
    let (mut page, _disposer) = opened_portfolio();
    let dialog = by_id(&page, "modalDialog");
    page.click(dialog);
    assert!(modal::is_open(&page));
}

#[test]
fn dismissing_a_closed_modal_changes_nothing() {
    let (mut page, _disposer) = loaded_portfolio();
    let modal_node = by_id(&page, "recommendationModal");
    page.document_mut().remove_attr(modal_node, "aria-hidden");

    page.key_down("Escape");
    let overlay = by_id(&page, "modalOverlay");
    page.click(overlay);

    assert!(!modal::is_open(&page));
    assert_eq!(aria_hidden(&page), None);
}

#[test]
fn dismiss_controls_added_after_install_are_honored() {
    let (mut page, _disposer) = opened_portfolio();
    let dialog = by_id(&page, "modalDialog");
    let extra = {
        let doc = page.document_mut();
        let button = doc.create_element("button");
        doc.set_attr(button, "data-modal-close", "true");
        doc.append_child(dialog, button);
        button
    };
    page.click(extra);
    assert!(!modal::is_open(&page));
}
