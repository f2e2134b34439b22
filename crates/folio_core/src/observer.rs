//! Visibility-intersection observer.
//!
//! Tracks registered targets against a root box derived from the viewport
//! and reports only state transitions, the way a browser observer does.

use crate::dom::{Document, NodeId};

/// Observer root configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Minimum visible fraction for a target to count as intersecting.
    pub threshold: f64,
    /// Added to the bottom edge of the viewport root; negative shrinks it.
    pub root_margin_bottom: f64,
}

/// One observed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

#[derive(Debug, Clone)]
struct Observed {
    node: NodeId,
    last: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    targets: Vec<Observed>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    /// Registers `node`; its initial state is reported by the next
    /// [`IntersectionObserver::take_records`]. Re-observing is a no-op.
    pub fn observe(&mut self, node: NodeId) {
        if self.targets.iter().any(|t| t.node == node) {
            return;
        }
        self.targets.push(Observed { node, last: None });
    }

    pub fn unobserve(&mut self, node: NodeId) {
        self.targets.retain(|t| t.node != node);
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    pub fn observed_len(&self) -> usize {
        self.targets.len()
    }

    /// Evaluates every connected target and returns the ones whose state
    /// changed since the previous evaluation, in registration order.
    pub fn take_records(
        &mut self,
        doc: &Document,
        scroll_y: f64,
        viewport_height: f64,
    ) -> Vec<IntersectionEntry> {
        let root_bottom = viewport_height + self.options.root_margin_bottom;
        let mut entries = Vec::new();
        for target in &mut self.targets {
            if !doc.is_connected(target.node) {
                continue;
            }
            let rect = doc.bounding_rect(target.node, scroll_y);
            let ratio = visible_ratio(rect.top, rect.bottom, 0.0, root_bottom);
            let is_intersecting = ratio > 0.0 && ratio >= self.options.threshold;
            if target.last == Some(is_intersecting) {
                continue;
            }
            target.last = Some(is_intersecting);
            entries.push(IntersectionEntry {
                target: target.node,
                is_intersecting,
                ratio,
            });
        }
        entries
    }
}

/// Fraction of `[top, bottom]` inside `[root_top, root_bottom]`.
/// A zero-height box counts as fully visible when it lies within the root.
pub fn visible_ratio(top: f64, bottom: f64, root_top: f64, root_bottom: f64) -> f64 {
    let height = bottom - top;
    if height <= 0.0 {
        return if top >= root_top && top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }
    let overlap = bottom.min(root_bottom) - top.max(root_top);
    (overlap.max(0.0) / height).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::{visible_ratio, IntersectionObserver, ObserverOptions};
    use crate::dom::{Document, LayoutBox};

    fn options() -> ObserverOptions {
        ObserverOptions {
            threshold: 0.1,
            root_margin_bottom: -50.0,
        }
    }

    #[test]
    fn visible_ratio_handles_partial_and_degenerate_boxes() {
        assert_eq!(visible_ratio(0.0, 100.0, 0.0, 50.0), 0.5);
        assert_eq!(visible_ratio(200.0, 300.0, 0.0, 100.0), 0.0);
        assert_eq!(visible_ratio(10.0, 10.0, 0.0, 100.0), 1.0);
        assert_eq!(visible_ratio(-10.0, -10.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn reports_initial_state_then_only_transitions() {
        let mut doc = Document::new();
        let card = doc.create_element("div");
        doc.set_layout(card, LayoutBox { top: 900.0, height: 200.0 });
        let body = doc.body();
        doc.append_child(body, card);

        let mut observer = IntersectionObserver::new(options());
        observer.observe(card);

        let initial = observer.take_records(&doc, 0.0, 800.0);
        assert_eq!(initial.len(), 1);
        assert!(!initial[0].is_intersecting);
        assert!(observer.take_records(&doc, 0.0, 800.0).is_empty());

        // root bottom is 750; 900 - 300 = 600 top, 150px of 200 visible.
        let entered = observer.take_records(&doc, 300.0, 800.0);
        assert_eq!(entered.len(), 1);
        assert!(entered[0].is_intersecting);
        assert!((entered[0].ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn root_margin_shrinks_the_bottom_edge() {
        let mut doc = Document::new();
        let item = doc.create_element("div");
        // Top sits 30px above the viewport bottom: inside the viewport, but
        // below the 50px-contracted root.
        doc.set_layout(item, LayoutBox { top: 770.0, height: 100.0 });
        let body = doc.body();
        doc.append_child(body, item);

        let mut observer = IntersectionObserver::new(options());
        observer.observe(item);
        let records = observer.take_records(&doc, 0.0, 800.0);
        assert!(!records[0].is_intersecting);
    }

    #[test]
    fn detached_targets_are_skipped() {
        let mut doc = Document::new();
        let item = doc.create_element("div");
        let mut observer = IntersectionObserver::new(options());
        observer.observe(item);
        observer.observe(item);
        assert_eq!(observer.observed_len(), 1);
        assert!(observer.take_records(&doc, 0.0, 800.0).is_empty());
    }
}
