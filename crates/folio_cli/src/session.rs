//! Scripted interaction sessions.
//!
//! A session file is a JSON array of steps replayed in order against one
//! page, for example:
//!
//! ```json
//! ["load", { "scroll": 700 }, { "click": "#heroProjects" }, { "advance": 300 }]
//! ```

use folio_core::notify::active_notifications;
use folio_core::{modal, nav, reveal, scroll, NodeId, Page, Toast};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// One user or clock action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Fires content-loaded.
    Load,
    Click(String),
    /// Scrolls the viewport to an absolute offset.
    Scroll(f64),
    Input { selector: String, value: String },
    Submit(String),
    Key(String),
    Hover(String),
    Leave(String),
    /// Moves the virtual clock forward by milliseconds.
    Advance(u64),
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Click(_) => "click",
            Self::Scroll(_) => "scroll",
            Self::Input { .. } => "input",
            Self::Submit(_) => "submit",
            Self::Key(_) => "key",
            Self::Hover(_) => "hover",
            Self::Leave(_) => "leave",
            Self::Advance(_) => "advance",
        }
    }
}

#[derive(Debug)]
pub enum SessionError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    ElementNotFound { step: usize, selector: String },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read session `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid session json: {err}"),
            Self::ElementNotFound { step, selector } => {
                write!(f, "step {step}: no element matches `{selector}`")
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::ElementNotFound { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

pub fn parse_steps(source: &str) -> Result<Vec<Step>, SessionError> {
    Ok(serde_json::from_str(source)?)
}

pub fn load_steps(path: &Path) -> Result<Vec<Step>, SessionError> {
    let source = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_steps(&source)
}

/// Replays `steps` in order. Stops at the first step whose selector
/// matches nothing.
pub fn replay(page: &mut Page, steps: &[Step]) -> Result<(), SessionError> {
    for (index, step) in steps.iter().enumerate() {
        debug!(
            "event=session_step module=session index={index} step={}",
            step.name()
        );
        match step {
            Step::Load => {
                page.content_loaded();
            }
            Step::Click(selector) => {
                let node = resolve(page, index, selector)?;
                page.click(node);
            }
            Step::Scroll(offset) => page.scroll_by_user(*offset),
            Step::Input { selector, value } => {
                let node = resolve(page, index, selector)?;
                page.set_value(node, value);
            }
            Step::Submit(selector) => {
                let node = resolve(page, index, selector)?;
                page.submit(node);
            }
            Step::Key(key) => {
                page.key_down(key);
            }
            Step::Hover(selector) => {
                let node = resolve(page, index, selector)?;
                page.mouse_enter(node);
            }
            Step::Leave(selector) => {
                let node = resolve(page, index, selector)?;
                page.mouse_leave(node);
            }
            Step::Advance(ms) => page.advance(*ms),
        }
    }
    Ok(())
}

fn resolve(page: &Page, step: usize, selector: &str) -> Result<NodeId, SessionError> {
    page.query(selector)
        .ok_or_else(|| SessionError::ElementNotFound {
            step,
            selector: selector.to_string(),
        })
}

/// Snapshot of the page state a visitor would notice.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub time_ms: u64,
    pub scroll_y: f64,
    pub menu_open: bool,
    pub navbar_scrolled: bool,
    pub scroll_top_visible: bool,
    pub active_links: Vec<String>,
    pub revealed: usize,
    pub reveal_targets: usize,
    pub skill_bars: Vec<SkillBarSummary>,
    pub modal_open: bool,
    /// Toasts still on screen.
    pub toasts: Vec<Toast>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillBarSummary {
    pub label: String,
    pub width: Option<String>,
}

impl PageSummary {
    pub fn capture(page: &Page) -> Self {
        let doc = page.document();
        let navbar_scrolled = doc
            .query_str(scroll::NAVBAR_SELECTOR)
            .is_some_and(|navbar| doc.has_class(navbar, scroll::SCROLLED_CLASS));
        let scroll_top_visible = doc
            .get_element_by_id(scroll::SCROLL_TOP_ID)
            .is_some_and(|button| doc.has_class(button, scroll::SHOW_CLASS));
        let active_links = doc
            .query_all_str(".nav-link.active")
            .into_iter()
            .filter_map(|link| doc.attr(link, "href").map(str::to_string))
            .collect();
        let targets = doc.query_all_str(reveal::REVEAL_SELECTOR);
        let revealed = targets
            .iter()
            .filter(|t| doc.has_class(**t, reveal::LOADED_CLASS))
            .count();
        let skill_bars = doc
            .query_all_str(reveal::SKILL_BAR_SELECTOR)
            .into_iter()
            .map(|bar| SkillBarSummary {
                label: doc
                    .id(bar)
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| format!("bar@{}", bar.index())),
                width: doc.style_value(bar, "width").map(str::to_string),
            })
            .collect();

        Self {
            time_ms: page.now_ms(),
            scroll_y: page.viewport().scroll_y,
            menu_open: nav::is_menu_open(page),
            navbar_scrolled,
            scroll_top_visible,
            active_links,
            revealed,
            reveal_targets: targets.len(),
            skill_bars,
            modal_open: modal::is_open(page),
            toasts: active_notifications(page).into_iter().cloned().collect(),
        }
    }
}

impl Display for PageSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "time_ms={}", self.time_ms)?;
        writeln!(f, "scroll_y={}", self.scroll_y)?;
        writeln!(f, "menu_open={}", self.menu_open)?;
        writeln!(f, "navbar_scrolled={}", self.navbar_scrolled)?;
        writeln!(f, "scroll_top_visible={}", self.scroll_top_visible)?;
        writeln!(f, "active_links=[{}]", self.active_links.join(", "))?;
        writeln!(f, "revealed={}/{}", self.revealed, self.reveal_targets)?;
        for bar in &self.skill_bars {
            writeln!(
                f,
                "skill {} width={}",
                bar.label,
                bar.width.as_deref().unwrap_or("-")
            )?;
        }
        write!(f, "modal_open={}", self.modal_open)?;
        for toast in &self.toasts {
            write!(
                f,
                "\ntoast kind={} phase={:?} message={:?}",
                toast.kind.as_str(),
                toast.phase,
                toast.message
            )?;
        }
        Ok(())
    }
}
