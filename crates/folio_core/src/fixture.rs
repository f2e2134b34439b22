//! Declarative page fixtures.
//!
//! # Responsibility
//! - Describe a rendered page (markup tree plus layout boxes and viewport)
//!   as JSON and build a [`Page`] from it.
//!
//! # Invariants
//! - Building never partially succeeds: any invalid element aborts the build.
//! - Form fields start with `value` as both default and live value.

use crate::config::InteractionConfig;
use crate::dom::{Document, LayoutBox, NodeId};
use crate::page::Page;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static TAG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("valid tag name regex"));

const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Root of a page fixture file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageFixture {
    #[serde(default)]
    pub viewport: ViewportSpec,
    /// Interaction overrides carried with the page.
    #[serde(default)]
    pub config: Option<InteractionConfig>,
    #[serde(default)]
    pub body: Vec<ElementSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSpec {
    pub height: f64,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    pub top: f64,
    pub height: f64,
}

/// One element of the fixture tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Whitespace-separated class list.
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Initial value of a form field.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub layout: Option<LayoutSpec>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

fn default_tag() -> String {
    "div".to_string()
}

/// Fixture loading and validation errors.
#[derive(Debug)]
pub enum FixtureError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    InvalidTag(String),
    InvalidLayout { tag: String, message: String },
    InvalidViewport(f64),
}

impl Display for FixtureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read fixture `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid fixture json: {err}"),
            Self::InvalidTag(tag) => write!(f, "invalid element tag `{tag}`"),
            Self::InvalidLayout { tag, message } => {
                write!(f, "invalid layout on <{tag}>: {message}")
            }
            Self::InvalidViewport(height) => {
                write!(f, "viewport height must be finite and positive, got {height}")
            }
        }
    }
}

impl Error for FixtureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidTag(_) | Self::InvalidLayout { .. } | Self::InvalidViewport(_) => None,
        }
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl PageFixture {
    pub fn from_json(source: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let source = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Builds the page. The fixture's `config`, if any, is returned alongside
    /// so callers can pass it to `install`.
    pub fn build(&self) -> Result<(Page, InteractionConfig), FixtureError> {
        let height = self.viewport.height;
        if !height.is_finite() || height <= 0.0 {
            return Err(FixtureError::InvalidViewport(height));
        }
        let mut doc = Document::new();
        let body = doc.body();
        for spec in &self.body {
            let node = build_element(&mut doc, spec)?;
            doc.append_child(body, node);
        }
        let config = self.config.clone().unwrap_or_default();
        Ok((Page::new(doc, height), config))
    }
}

fn build_element(doc: &mut Document, spec: &ElementSpec) -> Result<NodeId, FixtureError> {
    if !TAG_NAME_RE.is_match(&spec.tag) {
        return Err(FixtureError::InvalidTag(spec.tag.clone()));
    }
    let node = doc.create_element(&spec.tag);
    if let Some(id) = &spec.id {
        doc.set_attr(node, "id", id);
    }
    if let Some(class) = &spec.class {
        doc.set_class_name(node, class);
    }
    for (name, value) in &spec.attrs {
        doc.set_attr(node, name, value);
    }
    if let Some(value) = &spec.value {
        doc.set_default_value(node, value);
    }
    if let Some(layout) = spec.layout {
        if !layout.top.is_finite() || !layout.height.is_finite() || layout.height < 0.0 {
            return Err(FixtureError::InvalidLayout {
                tag: spec.tag.clone(),
                message: format!("top={} height={}", layout.top, layout.height),
            });
        }
        doc.set_layout(
            node,
            LayoutBox {
                top: layout.top,
                height: layout.height,
            },
        );
    }
    if let Some(text) = &spec.text {
        let text_node = doc.create_text(text);
        doc.append_child(node, text_node);
    }
    for child in &spec.children {
        let child_node = build_element(doc, child)?;
        doc.append_child(node, child_node);
    }
    Ok(node)
}
