#![allow(dead_code)]

use folio_core::{install, Disposer, NodeId, Page, PageFixture};

pub const PORTFOLIO_JSON: &str = include_str!("../fixtures/portfolio.json");

/// Builds the portfolio fixture without wiring any behavior.
pub fn portfolio_page() -> Page {
    let fixture = PageFixture::from_json(PORTFOLIO_JSON).expect("portfolio fixture parses");
    let (page, _) = fixture.build().expect("portfolio fixture builds");
    page
}

/// Builds the portfolio fixture, installs every interaction and fires
/// content-loaded.
pub fn loaded_portfolio() -> (Page, Disposer) {
    let fixture = PageFixture::from_json(PORTFOLIO_JSON).expect("portfolio fixture parses");
    let (mut page, config) = fixture.build().expect("portfolio fixture builds");
    let disposer = install(&mut page, config).expect("default config installs");
    page.content_loaded();
    (page, disposer)
}

pub fn by_id(page: &Page, id: &str) -> NodeId {
    page.document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("fixture element #{id} exists"))
}

pub fn has_class(page: &Page, id: &str, class: &str) -> bool {
    page.document().has_class(by_id(page, id), class)
}

pub fn nav_link(page: &Page, href: &str) -> NodeId {
    let doc = page.document();
    doc.query_all_str(".nav-link")
        .into_iter()
        .find(|link| doc.attr(*link, "href") == Some(href))
        .unwrap_or_else(|| panic!("nav link {href} exists"))
}

pub fn active_nav_links(page: &Page) -> Vec<String> {
    let doc = page.document();
    doc.query_all_str(".nav-link.active")
        .into_iter()
        .filter_map(|link| doc.attr(link, "href").map(str::to_string))
        .collect()
}
