// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Progress reporting port and an in-memory overlay model.

use std::fmt;

/// Completion of a transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percent {
    /// Known fraction, `0.0..=100.0`.
    Known(f32),
    /// Total size unknown.
    Indeterminate,
}

impl Percent {
    /// Percent from byte counts; unknown or zero totals are indeterminate.
    pub fn from_counts(received: u64, total: Option<u64>) -> Self {
        match total {
            Some(total) if total > 0 => {
                Self::Known(((received as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as f32)
            }
            _ => Self::Indeterminate,
        }
    }

    /// Known value, if any.
    pub fn value(self) -> Option<f32> {
        match self {
            Self::Known(v) => Some(v),
            Self::Indeterminate => None,
        }
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v:.0}%"),
            Self::Indeterminate => f.write_str("--%"),
        }
    }
}

/// Sink for the loader's progress UI.
///
/// Implementations must tolerate repeated identical calls.
pub trait ProgressSink {
    /// Show (or update) progress with a status message.
    fn show(&mut self, percent: Percent, message: &str);
    /// Hide the overlay.
    fn hide(&mut self);
    /// Show a terminal failure. Stays visible until the next `show`.
    fn fail(&mut self, reason: &str);
}

/// What the overlay currently displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OverlayState {
    /// Nothing on screen.
    #[default]
    Hidden,
    /// Progress bar with a message.
    Progress {
        /// Bar value.
        percent: Percent,
        /// Status line.
        message: String,
    },
    /// Failure message.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

/// Overlay model implementing [`ProgressSink`].
///
/// `revision` only moves when the visible state actually changes, so a
/// renderer can skip redraws for duplicate updates.
#[derive(Debug, Clone, Default)]
pub struct ProgressOverlay {
    state: OverlayState,
    revision: u64,
}

impl ProgressOverlay {
    /// Hidden overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Number of visible changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether anything is on screen.
    pub fn is_visible(&self) -> bool {
        self.state != OverlayState::Hidden
    }

    fn set(&mut self, next: OverlayState) {
        if self.state != next {
            self.state = next;
            self.revision += 1;
        }
    }
}

impl ProgressSink for ProgressOverlay {
    fn show(&mut self, percent: Percent, message: &str) {
        self.set(OverlayState::Progress {
            percent,
            message: message.to_owned(),
        });
    }

    fn hide(&mut self) {
        self.set(OverlayState::Hidden);
    }

    fn fail(&mut self, reason: &str) {
        self.set(OverlayState::Failed {
            reason: reason.to_owned(),
        });
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for Box<P> {
    fn show(&mut self, percent: Percent, message: &str) {
        (**self).show(percent, message);
    }

    fn hide(&mut self) {
        (**self).hide();
    }

    fn fail(&mut self, reason: &str) {
        (**self).fail(reason);
    }
}
