//! Interaction tuning constants.
//!
//! # Invariants
//! - Defaults reproduce the shipped page behavior exactly.
//! - `validate()` must pass before a config is installed on a page.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Thresholds, offsets and delays used by the interaction handlers.
///
/// Every field has a default, so a fixture may override any subset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Navbar gains `scrolled` strictly above this offset.
    pub navbar_scrolled_offset: f64,
    /// Scroll-top button gains `show` strictly above this offset.
    pub scroll_top_offset: f64,
    /// Sections count as reached this many pixels before their top.
    pub section_lookahead: f64,
    /// Gap kept between the navbar and an anchor target after scrolling.
    pub anchor_margin: f64,
    pub skill_animation_delay_ms: u64,
    /// Visible fraction needed before an element reveals.
    pub reveal_threshold: f64,
    /// Bottom root-margin of the reveal observer; negative shrinks the root.
    pub reveal_root_margin_bottom: f64,
    pub toast_enter_delay_ms: u64,
    /// Time from creation until a toast starts leaving.
    pub toast_hold_ms: u64,
    /// Time from leaving until the toast node is removed.
    pub toast_exit_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            navbar_scrolled_offset: 100.0,
            scroll_top_offset: 300.0,
            section_lookahead: 200.0,
            anchor_margin: 20.0,
            skill_animation_delay_ms: 200,
            reveal_threshold: 0.1,
            reveal_root_margin_bottom: -50.0,
            toast_enter_delay_ms: 100,
            toast_hold_ms: 3_000,
            toast_exit_ms: 300,
        }
    }
}

impl InteractionConfig {
    /// Validates value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let offsets = [
            ("navbar_scrolled_offset", self.navbar_scrolled_offset),
            ("scroll_top_offset", self.scroll_top_offset),
            ("section_lookahead", self.section_lookahead),
            ("anchor_margin", self.anchor_margin),
        ];
        for (field, value) in offsets {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidOffset { field, value });
            }
        }
        if !self.reveal_root_margin_bottom.is_finite() {
            return Err(ConfigError::InvalidOffset {
                field: "reveal_root_margin_bottom",
                value: self.reveal_root_margin_bottom,
            });
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::InvalidThreshold(self.reveal_threshold));
        }
        if self.toast_enter_delay_ms > self.toast_hold_ms {
            return Err(ConfigError::ToastTimeline {
                enter_delay_ms: self.toast_enter_delay_ms,
                hold_ms: self.toast_hold_ms,
            });
        }
        Ok(())
    }
}

/// Config validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidOffset { field: &'static str, value: f64 },
    InvalidThreshold(f64),
    ToastTimeline { enter_delay_ms: u64, hold_ms: u64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOffset { field, value } => {
                write!(f, "`{field}` must be a finite non-negative offset, got {value}")
            }
            Self::InvalidThreshold(value) => {
                write!(f, "`reveal_threshold` must be within 0..=1, got {value}")
            }
            Self::ToastTimeline {
                enter_delay_ms,
                hold_ms,
            } => write!(
                f,
                "toast enter delay {enter_delay_ms}ms exceeds hold time {hold_ms}ms"
            ),
        }
    }
}

impl Error for ConfigError {}
