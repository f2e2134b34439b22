mod support;

use folio_core::{install, InteractionConfig, PageFixture};
use support::{active_nav_links, loaded_portfolio, nav_link};

fn menu_markers(page: &folio_core::Page) -> (bool, bool) {
    let doc = page.document();
    let hamburger = doc.query_str(".hamburger").expect("hamburger exists");
    let menu = doc.query_str(".nav-menu").expect("menu exists");
    (doc.has_class(hamburger, "active"), doc.has_class(menu, "active"))
}

#[test]
fn toggle_parity_keeps_control_and_panel_in_lockstep() {
    let (mut page, _disposer) = loaded_portfolio();
    let hamburger = page.query(".hamburger").expect("hamburger exists");

    for clicks in 1..=6 {
        page.click(hamburger);
        let expected_open = clicks % 2 == 1;
        assert_eq!(menu_markers(&page), (expected_open, expected_open));
    }
}

#[test]
fn clicking_inner_bar_of_toggle_still_toggles() {
    let (mut page, _disposer) = loaded_portfolio();
    let bar = page.query(".bar").expect("bar exists");
    page.click(bar);
    assert_eq!(menu_markers(&page), (true, true));
}

#[test]
fn nav_link_click_always_closes_menu() {
    let (mut page, _disposer) = loaded_portfolio();
    let hamburger = page.query(".hamburger").expect("hamburger exists");
    let about = nav_link(&page, "#about");

    page.click(hamburger);
    assert_eq!(menu_markers(&page), (true, true));
    page.click(about);
    assert_eq!(menu_markers(&page), (false, false));

    // Already closed: still closed, nothing else flips.
    page.click(about);
    assert_eq!(menu_markers(&page), (false, false));
}

#[test]
fn scroll_highlights_last_reached_section() {
    let (mut page, _disposer) = loaded_portfolio();
    // Sections sit at 0, 500, 1000, ...; 500 - 200 <= 600 < 1000 - 200.
    page.scroll_by_user(600.0);
    assert_eq!(active_nav_links(&page), vec!["#about".to_string()]);

    page.scroll_by_user(800.0);
    assert_eq!(active_nav_links(&page), vec!["#projects".to_string()]);

    page.scroll_by_user(10.0);
    assert_eq!(active_nav_links(&page), vec!["#home".to_string()]);
}

#[test]
fn bottom_of_page_highlights_last_section() {
    let (mut page, _disposer) = loaded_portfolio();
    page.scroll_by_user(page.max_scroll());
    assert_eq!(active_nav_links(&page), vec!["#contact".to_string()]);
}

#[test]
fn no_link_is_highlighted_before_the_first_section_is_reached() {
    let fixture = PageFixture::from_json(
        r##"{
            "viewport": { "height": 400 },
            "body": [
                { "tag": "a", "class": "nav-link active", "attrs": { "href": "#intro" } },
                { "tag": "section", "id": "intro", "layout": { "top": 600, "height": 800 } }
            ]
        }"##,
    )
    .expect("fixture parses");
    let (mut page, _) = fixture.build().expect("fixture builds");
    let _disposer = install(&mut page, InteractionConfig::default()).expect("installs");

    page.scroll_by_user(399.0);
    assert!(active_nav_links(&page).is_empty());

    page.scroll_by_user(400.0);
    assert_eq!(active_nav_links(&page), vec!["#intro".to_string()]);
}

#[test]
fn section_ids_match_link_fragments_case_sensitively() {
    let fixture = PageFixture::from_json(
        r##"{
            "body": [
                { "tag": "a", "class": "nav-link", "attrs": { "href": "#About" } },
                { "tag": "section", "id": "about", "layout": { "top": 0, "height": 2000 } }
            ]
        }"##,
    )
    .expect("fixture parses");
    let (mut page, _) = fixture.build().expect("fixture builds");
    let _disposer = install(&mut page, InteractionConfig::default()).expect("installs");

    page.scroll_by_user(50.0);
    assert!(active_nav_links(&page).is_empty());
}

#[test]
fn section_without_id_clears_highlight() {
    let fixture = PageFixture::from_json(
        r##"{
            "body": [
                { "tag": "a", "class": "nav-link", "attrs": { "href": "#first" } },
                { "tag": "section", "id": "first", "layout": { "top": 0, "height": 1000 } },
                { "tag": "section", "layout": { "top": 1000, "height": 1000 } }
            ]
        }"##,
    )
    .expect("fixture parses");
    let (mut page, _) = fixture.build().expect("fixture builds");
    let _disposer = install(&mut page, InteractionConfig::default()).expect("installs");

    page.scroll_by_user(100.0);
    assert_eq!(active_nav_links(&page), vec!["#first".to_string()]);
    page.scroll_by_user(900.0);
    assert!(active_nav_links(&page).is_empty());
}

#[test]
fn missing_menu_disables_only_the_toggle() {
    let fixture = PageFixture::from_json(
        r##"{
            "body": [
                { "tag": "div", "class": "hamburger" },
                { "tag": "nav", "class": "navbar" },
                { "tag": "section", "id": "s", "layout": { "top": 0, "height": 3000 } }
            ]
        }"##,
    )
    .expect("fixture parses");
    let (mut page, _) = fixture.build().expect("fixture builds");
    let _disposer = install(&mut page, InteractionConfig::default()).expect("installs");

    let hamburger = page.query(".hamburger").expect("hamburger exists");
    let outcome = page.click(hamburger);
    assert_eq!(outcome.handled, 0);
    assert!(!page.document().has_class(hamburger, "active"));

    page.scroll_by_user(150.0);
    let navbar = page.query(".navbar").expect("navbar exists");
    assert!(page.document().has_class(navbar, "scrolled"));
}
