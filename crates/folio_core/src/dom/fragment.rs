//! Markup fragment parsing and text escaping.
//!
//! # Responsibility
//! - Parse the small, well-formed markup templates the page builds at runtime
//!   into a node tree.
//! - Escape user text before it is interpolated into such templates.
//!
//! # Invariants
//! - Entity references in text and attribute values are decoded exactly once,
//!   so escaped user input always ends up as literal text, never as elements.
//! - Every non-void element must be closed by a matching end tag.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?P<close>/)?(?P<tag>[A-Za-z][A-Za-z0-9-]*)(?P<attrs>[^<>]*)>")
        .expect("valid markup tag regex")
});
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<name>[A-Za-z_:][\w:.-]*)(?:\s*=\s*"(?P<value>[^"]*)")?"#)
        .expect("valid markup attribute regex")
});
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#0*39|apos);").expect("valid entity regex"));

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Returns whether `tag` never has children or an end tag.
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Escapes `& < > " '` as `&amp; &lt; &gt; &quot; &#039;`.
///
/// `&` is replaced first so produced entities are never double-escaped.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Decodes the entities produced by [`escape_html`] (plus `&#39;`/`&apos;`).
pub fn unescape_html(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &regex::Captures<'_>| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Parsed markup node, detached from any document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<FragmentNode>,
    },
    Text(String),
}

/// Markup fragment parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    UnexpectedClose { tag: String },
    MismatchedClose { expected: String, found: String },
    Unclosed { tag: String },
}

impl Display for MarkupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedClose { tag } => write!(f, "unexpected end tag </{tag}>"),
            Self::MismatchedClose { expected, found } => {
                write!(f, "expected </{expected}>, found </{found}>")
            }
            Self::Unclosed { tag } => write!(f, "element <{tag}> is never closed"),
        }
    }
}

impl Error for MarkupError {}

struct OpenElement {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<FragmentNode>,
}

/// Parses a markup fragment into top-level nodes.
pub fn parse_fragment(markup: &str) -> Result<Vec<FragmentNode>, MarkupError> {
    let mut roots: Vec<FragmentNode> = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut cursor = 0;

    for caps in TAG_RE.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut roots, &mut stack, &markup[cursor..whole.start()]);
        cursor = whole.end();

        let tag = caps["tag"].to_ascii_lowercase();
        if caps.name("close").is_some() {
            let Some(open) = stack.pop() else {
                return Err(MarkupError::UnexpectedClose { tag });
            };
            if open.tag != tag {
                return Err(MarkupError::MismatchedClose {
                    expected: open.tag,
                    found: tag,
                });
            }
            let node = FragmentNode::Element {
                tag: open.tag,
                attrs: open.attrs,
                children: open.children,
            };
            push_node(&mut roots, &mut stack, node);
            continue;
        }

        let raw_attrs = caps.name("attrs").map(|m| m.as_str()).unwrap_or_default();
        let self_closing = raw_attrs.trim_end().ends_with('/');
        let attrs = parse_attrs(raw_attrs.trim_end().trim_end_matches('/'));
        if self_closing || is_void_tag(&tag) {
            push_node(
                &mut roots,
                &mut stack,
                FragmentNode::Element {
                    tag,
                    attrs,
                    children: Vec::new(),
                },
            );
        } else {
            stack.push(OpenElement {
                tag,
                attrs,
                children: Vec::new(),
            });
        }
    }

    push_text(&mut roots, &mut stack, &markup[cursor..]);
    if let Some(open) = stack.pop() {
        return Err(MarkupError::Unclosed { tag: open.tag });
    }
    Ok(roots)
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .name("value")
                .map(|m| unescape_html(m.as_str()))
                .unwrap_or_default();
            (caps["name"].to_ascii_lowercase(), value)
        })
        .collect()
}

fn push_text(roots: &mut Vec<FragmentNode>, stack: &mut [OpenElement], raw: &str) {
    if raw.is_empty() {
        return;
    }
    push_node(roots, stack, FragmentNode::Text(unescape_html(raw)));
}

fn push_node(roots: &mut Vec<FragmentNode>, stack: &mut [OpenElement], node: FragmentNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}
