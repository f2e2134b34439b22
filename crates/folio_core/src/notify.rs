//! Toast notifications.
//!
//! # Responsibility
//! - Create one transient banner per call and walk it through a timed
//!   lifecycle: scheduled, visible, dismissing, removed.
//!
//! # Invariants
//! - Phases only move forward; a late or repeated timer never revives a toast.
//! - Removal always happens once its timer fires, whatever the page state.
//! - At most [`REMOVED_TOAST_RETENTION`] removed toasts stay in the page's
//!   toast table; older ones are pruned. Their detached nodes stay in the
//!   document arena.
//! - Toasts are not queued: concurrent ones share the same fixed screen
//!   position and overlap. This is a known limitation, kept as shipped.

use crate::dom::NodeId;
use crate::page::Page;
use crate::timers::TimerTask;
use log::debug;
use serde::Serialize;
use uuid::Uuid;

/// Stable identifier of one toast.
pub type ToastId = Uuid;

pub const NOTIFICATION_CLASS: &str = "notification";
/// Removed toasts kept for inspection before the oldest are pruned.
pub const REMOVED_TOAST_RETENTION: usize = 32;
const SUCCESS_BACKGROUND: &str = "#10b981";
const ERROR_BACKGROUND: &str = "#ef4444";
const HIDDEN_TRANSFORM: &str = "translateX(100%)";
const SHOWN_TRANSFORM: &str = "translateX(0)";

/// Toast flavor; drives the class name and background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Success => SUCCESS_BACKGROUND,
            Self::Error => ERROR_BACKGROUND,
        }
    }
}

/// Lifecycle phase of a toast, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPhase {
    /// Attached off-screen, waiting to slide in.
    Scheduled,
    Visible,
    /// Sliding out; node still attached.
    Dismissing,
    /// Node detached from the document.
    Removed,
}

/// One toast and its current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    #[serde(skip)]
    pub node: NodeId,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: ToastPhase,
    pub created_at_ms: u64,
}

fn base_css(kind: NotificationKind) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; padding: 15px 20px; \
         background: {}; color: white; border-radius: 8px; \
         box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); z-index: 10000; \
         transform: {HIDDEN_TRANSFORM}; transition: transform 0.3s ease;",
        kind.background()
    )
}

/// Appends a toast to the body and schedules its lifecycle.
pub fn show_notification(page: &mut Page, message: &str, kind: NotificationKind) -> ToastId {
    let node = page.doc.create_element("div");
    page.doc
        .set_class_name(node, &format!("{NOTIFICATION_CLASS} {}", kind.as_str()));
    page.doc.set_text_content(node, message);
    page.doc.set_css_text(node, &base_css(kind));
    let body = page.doc.body();
    page.doc.append_child(body, node);

    let id = Uuid::new_v4();
    page.toasts.push(Toast {
        id,
        node,
        kind,
        message: message.to_string(),
        phase: ToastPhase::Scheduled,
        created_at_ms: page.timers.now_ms(),
    });
    page.timers.schedule(
        page.config.toast_enter_delay_ms,
        TimerTask::Toast {
            id,
            phase: ToastPhase::Visible,
        },
    );
    page.timers.schedule(
        page.config.toast_hold_ms,
        TimerTask::Toast {
            id,
            phase: ToastPhase::Dismissing,
        },
    );
    debug!(
        "event=toast_show module=notify kind={} message_len={}",
        kind.as_str(),
        message.chars().count()
    );
    id
}

/// Applies a timer-driven phase change.
pub(crate) fn enter_phase(page: &mut Page, id: ToastId, phase: ToastPhase) {
    let Some(index) = page.toasts.iter().position(|t| t.id == id) else {
        return;
    };
    if page.toasts[index].phase >= phase {
        return;
    }
    let node = page.toasts[index].node;
    page.toasts[index].phase = phase;
    match phase {
        ToastPhase::Scheduled => {}
        ToastPhase::Visible => page.doc.set_style(node, "transform", SHOWN_TRANSFORM),
        ToastPhase::Dismissing => {
            page.doc.set_style(node, "transform", HIDDEN_TRANSFORM);
            page.timers.schedule(
                page.config.toast_exit_ms,
                TimerTask::Toast {
                    id,
                    phase: ToastPhase::Removed,
                },
            );
        }
        ToastPhase::Removed => {
            page.doc.detach(node);
            prune_removed(&mut page.toasts);
            debug!("event=toast_removed module=notify");
        }
    }
}

/// Drops the oldest removed toasts beyond the retention limit.
fn prune_removed(toasts: &mut Vec<Toast>) {
    let removed = toasts
        .iter()
        .filter(|t| t.phase == ToastPhase::Removed)
        .count();
    let mut excess = removed.saturating_sub(REMOVED_TOAST_RETENTION);
    if excess == 0 {
        return;
    }
    toasts.retain(|t| {
        if excess > 0 && t.phase == ToastPhase::Removed {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

/// Toasts whose node is still attached.
pub fn active_notifications(page: &Page) -> Vec<&Toast> {
    page.toasts
        .iter()
        .filter(|t| t.phase != ToastPhase::Removed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        base_css, prune_removed, NotificationKind, Toast, ToastPhase, REMOVED_TOAST_RETENTION,
    };
    use crate::dom::style::InlineStyle;
    use crate::dom::Document;
    use uuid::Uuid;

    fn toast(node: crate::dom::NodeId, message: String, phase: ToastPhase) -> Toast {
        Toast {
            id: Uuid::new_v4(),
            node,
            kind: NotificationKind::Success,
            message,
            phase,
            created_at_ms: 0,
        }
    }

    #[test]
    fn pruning_drops_oldest_removed_and_keeps_live_toasts() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        let mut toasts = vec![toast(node, "live".to_string(), ToastPhase::Visible)];
        for n in 0..REMOVED_TOAST_RETENTION + 3 {
            toasts.push(toast(node, format!("gone {n}"), ToastPhase::Removed));
        }

        prune_removed(&mut toasts);

        assert_eq!(toasts.len(), REMOVED_TOAST_RETENTION + 1);
        assert_eq!(toasts[0].message, "live");
        assert_eq!(toasts[1].message, "gone 3");
        assert_eq!(
            toasts.last().map(|t| t.message.as_str()),
            Some(format!("gone {}", REMOVED_TOAST_RETENTION + 2).as_str())
        );
    }

    #[test]
    fn kind_defaults_to_success() {
        assert_eq!(NotificationKind::default(), NotificationKind::Success);
    }

    #[test]
    fn css_uses_kind_background_and_starts_off_screen() {
        let mut style = InlineStyle::default();
        style.set_css_text(&base_css(NotificationKind::Error));
        assert_eq!(style.get("background"), Some("#ef4444"));
        assert_eq!(style.get("transform"), Some("translateX(100%)"));
        assert_eq!(style.get("top"), Some("20px"));
        assert_eq!(style.get("z-index"), Some("10000"));
    }
}
