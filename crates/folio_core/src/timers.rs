//! Virtual-clock timer queue.
//!
//! # Responsibility
//! - Hold deferred continuations scheduled by interaction handlers.
//! - Release them in due-time order as the page clock advances.
//!
//! # Invariants
//! - The clock never moves backwards.
//! - Timers due at the same instant fire in scheduling order.
//! - There is no cancellation: every scheduled timer eventually fires.

use crate::dom::NodeId;
use crate::notify::{ToastId, ToastPhase};
use std::collections::BTreeMap;

/// Deferred continuation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Copy a progress value into a skill bar's width.
    SkillWidth { bar: NodeId, width: String },
    /// Move a toast to its next lifecycle phase.
    Toast { id: ToastId, phase: ToastPhase },
}

/// Ordered queue of pending timers on a millisecond virtual clock.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_seq: u64,
    pending: BTreeMap<(u64, u64), TimerTask>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules `task` to fire `delay_ms` after the current instant.
    /// Returns the absolute due time.
    pub fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> u64 {
        let due = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((due, self.next_seq), task);
        self.next_seq += 1;
        due
    }

    /// Pops the earliest task due at or before `until_ms`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerTask> {
        let (&(due, _), _) = self.pending.first_key_value()?;
        if due > until_ms {
            return None;
        }
        let ((due, _), task) = self.pending.pop_first()?;
        self.now_ms = self.now_ms.max(due);
        Some(task)
    }

    /// Moves the clock forward to `until_ms` without firing anything.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the next pending timer.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }
}

#[cfg(test)]
mod tests {
    use super::{TimerQueue, TimerTask};
    use crate::dom::Document;

    fn width_task(doc: &mut Document, width: &str) -> TimerTask {
        TimerTask::SkillWidth {
            bar: doc.create_element("div"),
            width: width.to_string(),
        }
    }

    #[test]
    fn pops_in_due_order_then_scheduling_order() {
        let mut doc = Document::new();
        let mut queue = TimerQueue::new();
        let late = width_task(&mut doc, "late");
        let first = width_task(&mut doc, "first");
        let second = width_task(&mut doc, "second");
        queue.schedule(300, late.clone());
        queue.schedule(100, first.clone());
        queue.schedule(100, second.clone());

        assert_eq!(queue.pop_due(1_000), Some(first));
        assert_eq!(queue.now_ms(), 100);
        assert_eq!(queue.pop_due(1_000), Some(second));
        assert_eq!(queue.pop_due(1_000), Some(late));
        assert_eq!(queue.now_ms(), 300);
        assert_eq!(queue.pop_due(1_000), None);
    }

    #[test]
    fn tasks_beyond_horizon_stay_pending() {
        let mut doc = Document::new();
        let mut queue = TimerQueue::new();
        let task = width_task(&mut doc, "80");
        assert_eq!(queue.schedule(200, task), 200);
        assert_eq!(queue.pop_due(199), None);
        queue.settle(199);
        assert_eq!(queue.now_ms(), 199);
        assert_eq!(queue.pending_len(), 1);
        assert_eq!(queue.next_due(), Some(200));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut queue = TimerQueue::new();
        queue.settle(500);
        queue.settle(100);
        assert_eq!(queue.now_ms(), 500);
    }
}
