//! Compound selector subset used by page wiring.
//!
//! Supported: comma-separated lists of compound selectors built from an
//! optional tag (or `*`), `#id`, `.class`, `[attr]`, `[attr="v"]` and
//! `[attr^="v"]`. Combinators are not supported.

use super::{Document, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:#(?P<id>[A-Za-z_][\w-]*)|\.(?P<class>-?[A-Za-z_][\w-]*)|\[(?P<attr>[A-Za-z_][\w:.-]*)(?:(?P<op>\^?=)"(?P<val>[^"]*)")?\]|(?P<tag>[A-Za-z][A-Za-z0-9-]*|\*))"#,
    )
    .expect("valid selector token regex")
});

/// Selector parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    Unsupported(String),
}

impl Display for SelectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "selector must not be empty"),
            Self::Unsupported(value) => write!(f, "unsupported selector: {value}"),
        }
    }
}

impl Error for SelectorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

impl Compound {
    fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut compound = Compound::default();
        let mut rest = trimmed;
        let mut first = true;
        while !rest.is_empty() {
            let caps = TOKEN_RE
                .captures(rest)
                .ok_or_else(|| SelectorError::Unsupported(trimmed.to_string()))?;
            if let Some(tag) = caps.name("tag") {
                if !first {
                    return Err(SelectorError::Unsupported(trimmed.to_string()));
                }
                if tag.as_str() != "*" {
                    compound.tag = Some(tag.as_str().to_ascii_lowercase());
                }
            } else if let Some(id) = caps.name("id") {
                compound.id = Some(id.as_str().to_string());
            } else if let Some(class) = caps.name("class") {
                compound.classes.push(class.as_str().to_string());
            } else if let Some(attr) = caps.name("attr") {
                let value = caps
                    .name("val")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let op = match caps.name("op").map(|m| m.as_str()) {
                    None => AttrOp::Exists,
                    Some("=") => AttrOp::Equals(value),
                    Some(_) => AttrOp::Prefix(value),
                };
                compound.attrs.push(AttrCondition {
                    name: attr.as_str().to_string(),
                    op,
                });
            }
            let consumed = caps.get(0).map(|m| m.end()).unwrap_or(rest.len());
            rest = &rest[consumed..];
            first = false;
        }
        Ok(compound)
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.tag(node) != Some(tag.as_str()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.id(node) != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|cond| {
            let value = if cond.name == "class" {
                Some(doc.class_name(node))
            } else {
                doc.attr(node, &cond.name).map(str::to_string)
            };
            match (&cond.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(actual)) => actual == *expected,
                (AttrOp::Prefix(prefix), Some(actual)) => {
                    !prefix.is_empty() && actual.starts_with(prefix.as_str())
                }
            }
        })
    }
}

/// Parsed selector list; matches when any member compound matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    compounds: Vec<Compound>,
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let compounds = source
            .split(',')
            .map(Compound::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.trim().to_string(),
            compounds,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.compounds.iter().any(|c| c.matches(doc, node))
    }
}
