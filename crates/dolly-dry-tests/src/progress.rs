// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Progress sink that records every call.

use std::sync::{Arc, Mutex, MutexGuard};

use dolly_app_core::progress::{Percent, ProgressSink};

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    /// `show(percent, message)`.
    Show(Percent, String),
    /// `hide()`.
    Hide,
    /// `fail(reason)`.
    Fail(String),
}

/// [`ProgressSink`] that records calls. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SinkCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.lock().clone()
    }

    /// Most recent call.
    pub fn last(&self) -> Option<SinkCall> {
        self.lock().last().cloned()
    }

    /// Percent values passed to `show`, in order.
    pub fn percents(&self) -> Vec<Percent> {
        self.lock()
            .iter()
            .filter_map(|c| match c {
                SinkCall::Show(p, _) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Reasons passed to `fail`, in order.
    pub fn failures(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|c| match c {
                SinkCall::Fail(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ProgressSink for RecordingSink {
    fn show(&mut self, percent: Percent, message: &str) {
        self.lock().push(SinkCall::Show(percent, message.to_owned()));
    }

    fn hide(&mut self) {
        self.lock().push(SinkCall::Hide);
    }

    fn fail(&mut self, reason: &str) {
        self.lock().push(SinkCall::Fail(reason.to_owned()));
    }
}
