mod support;

use folio_core::ScrollBehavior;
use support::{active_nav_links, by_id, has_class, loaded_portfolio, nav_link};

#[test]
fn navbar_gains_scrolled_marker_strictly_past_threshold() {
    let (mut page, _disposer) = loaded_portfolio();
    let navbar = page.query(".navbar").expect("navbar exists");

    page.scroll_by_user(99.0);
    assert!(!page.document().has_class(navbar, "scrolled"));
    page.scroll_by_user(100.0);
    assert!(!page.document().has_class(navbar, "scrolled"));
    page.scroll_by_user(101.0);
    assert!(page.document().has_class(navbar, "scrolled"));
    page.scroll_by_user(0.0);
    assert!(!page.document().has_class(navbar, "scrolled"));
}

#[test]
fn scroll_top_button_shows_strictly_past_threshold() {
    let (mut page, _disposer) = loaded_portfolio();

    page.scroll_by_user(299.0);
    assert!(!has_class(&page, "scrollTopBtn", "show"));
    page.scroll_by_user(300.0);
    assert!(!has_class(&page, "scrollTopBtn", "show"));
    page.scroll_by_user(301.0);
    assert!(has_class(&page, "scrollTopBtn", "show"));
}

#[test]
fn scroll_top_button_click_smooth_scrolls_to_origin() {
    let (mut page, _disposer) = loaded_portfolio();
    page.scroll_by_user(1_200.0);
    assert!(has_class(&page, "scrollTopBtn", "show"));

    let button = by_id(&page, "scrollTopBtn");
    page.click(button);

    let requests = page.scroll_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].top, 0.0);
    assert_eq!(requests[0].behavior, ScrollBehavior::Smooth);
    assert_eq!(page.viewport().scroll_y, 0.0);
    assert!(!has_class(&page, "scrollTopBtn", "show"));
}

#[test]
fn anchor_click_scrolls_below_fixed_navbar() {
    let (mut page, _disposer) = loaded_portfolio();
    let link = by_id(&page, "heroProjects");

    let outcome = page.click(link);

    assert!(outcome.default_prevented);
    let requests = page.scroll_requests();
    assert_eq!(requests.len(), 1);
    // 1000 (section top) - 70 (navbar height) - 20 (margin).
    assert_eq!(requests[0].top, 910.0);
    assert_eq!(requests[0].behavior, ScrollBehavior::Smooth);
    assert_eq!(page.viewport().scroll_y, 910.0);
}

#[test]
fn anchor_target_past_the_end_is_clamped() {
    let (mut page, _disposer) = loaded_portfolio();
    let link = nav_link(&page, "#contact");

    page.click(link);

    let requests = page.scroll_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].top, 1_910.0);
    assert_eq!(requests[0].applied, page.max_scroll());
    assert_eq!(active_nav_links(&page), vec!["#contact".to_string()]);
}

#[test]
fn anchor_to_missing_section_is_a_silent_no_op() {
    let (mut page, _disposer) = loaded_portfolio();
    page.scroll_by_user(250.0);
    let link = by_id(&page, "brokenLink");

    let outcome = page.click(link);

    assert!(outcome.default_prevented);
    assert!(page.scroll_requests().is_empty());
    assert_eq!(page.viewport().scroll_y, 250.0);
}

#[test]
fn bare_hash_anchor_neither_scrolls_nor_navigates() {
    let (mut page, _disposer) = loaded_portfolio();
    page.scroll_by_user(250.0);
    let link = by_id(&page, "bareHash");

    let outcome = page.click(link);

    assert!(outcome.default_prevented);
    assert!(page.scroll_requests().is_empty());
    assert_eq!(page.viewport().scroll_y, 250.0);
}

#[test]
fn scrolling_to_the_same_offset_fires_nothing() {
    let (mut page, _disposer) = loaded_portfolio();
    page.scroll_by_user(150.0);
    let navbar = page.query(".navbar").expect("navbar exists");
    page.document_mut().remove_class(navbar, "scrolled");

    page.scroll_by_user(150.0);

    assert!(!page.document().has_class(navbar, "scrolled"));
}
