// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted fetcher with controllable timing and cancellation records.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use dolly_loader::{AssetSource, CancelToken, FetchError, FetchProgress, Fetcher, ProgressFn};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::Notify;

/// One step of a scripted fetch.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Report progress.
    Progress {
        /// Bytes received so far.
        received: u64,
        /// Total, if known.
        total: Option<u64>,
    },
    /// Sleep (virtual time under `start_paused`).
    Sleep(Duration),
    /// Wait until the test calls `notify_one` on the gate.
    Gate(Arc<Notify>),
    /// Never finish; only cancellation ends the fetch.
    Hang,
}

/// Steps to play followed by the final result.
#[derive(Debug, Clone)]
pub struct FetchScript {
    steps: Vec<ScriptStep>,
    result: Result<Bytes, FetchError>,
}

impl FetchScript {
    /// Script that succeeds with `bytes`.
    pub fn ok(bytes: impl Into<Bytes>) -> Self {
        Self {
            steps: Vec::new(),
            result: Ok(bytes.into()),
        }
    }

    /// Script that fails with `err`.
    pub fn err(err: FetchError) -> Self {
        Self {
            steps: Vec::new(),
            result: Err(err),
        }
    }

    /// Append a progress report.
    pub fn progress(mut self, received: u64, total: Option<u64>) -> Self {
        self.steps.push(ScriptStep::Progress { received, total });
        self
    }

    /// Append a sleep.
    pub fn sleep(mut self, duration: Duration) -> Self {
        self.steps.push(ScriptStep::Sleep(duration));
        self
    }

    /// Append a gate released by `gate.notify_one()`.
    pub fn gate(mut self, gate: Arc<Notify>) -> Self {
        self.steps.push(ScriptStep::Gate(gate));
        self
    }

    /// Append a step that never finishes.
    pub fn hang(mut self) -> Self {
        self.steps.push(ScriptStep::Hang);
        self
    }
}

/// Record of one `fetch` call.
#[derive(Debug, Clone)]
pub struct FetchCall {
    /// Requested source.
    pub source: AssetSource,
    /// Token handed to the fetch.
    pub cancel: CancelToken,
    /// The fetch future ran to completion.
    pub completed: bool,
    /// The fetch future was dropped before completing.
    pub aborted: bool,
}

#[derive(Default)]
struct Inner {
    scripts: HashMap<String, VecDeque<FetchScript>>,
    fallback: Option<FetchScript>,
    calls: Vec<FetchCall>,
}

/// [`Fetcher`] that plays scripts keyed by source. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedFetcher {
    /// Fetcher with no scripts; unscripted sources fail with a network error.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue `script` for the next fetch of `source`.
    pub fn script(&self, source: &AssetSource, script: FetchScript) -> &Self {
        self.lock()
            .scripts
            .entry(source.to_string())
            .or_default()
            .push_back(script);
        self
    }

    /// Script used when no source-specific script is queued.
    pub fn fallback(&self, script: FetchScript) -> &Self {
        self.lock().fallback = Some(script);
        self
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<FetchCall> {
        self.lock().calls.clone()
    }
}

struct CallGuard {
    state: Arc<Mutex<Inner>>,
    index: usize,
    completed: bool,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        let mut inner = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(call) = inner.calls.get_mut(self.index) {
            call.completed = self.completed;
            call.aborted = !self.completed;
        }
    }
}

async fn play(
    script: FetchScript,
    progress: &mut ProgressFn,
    cancel: &CancelToken,
) -> Result<Bytes, FetchError> {
    for step in script.steps {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        match step {
            ScriptStep::Progress { received, total } => {
                progress(FetchProgress::new(received, total));
            }
            ScriptStep::Sleep(duration) => tokio::select! {
                () = cancel.cancelled() => return Err(FetchError::Cancelled),
                () = tokio::time::sleep(duration) => {}
            },
            ScriptStep::Gate(gate) => tokio::select! {
                () = cancel.cancelled() => return Err(FetchError::Cancelled),
                () = gate.notified() => {}
            },
            ScriptStep::Hang => {
                cancel.cancelled().await;
                return Err(FetchError::Cancelled);
            }
        }
    }
    script.result
}

impl Fetcher for ScriptedFetcher {
    fn fetch(
        &self,
        source: &AssetSource,
        mut progress: ProgressFn,
        cancel: CancelToken,
    ) -> BoxFuture<'static, Result<Bytes, FetchError>> {
        let (index, script) = {
            let mut inner = self.lock();
            let index = inner.calls.len();
            inner.calls.push(FetchCall {
                source: source.clone(),
                cancel: cancel.clone(),
                completed: false,
                aborted: false,
            });
            let queued = inner
                .scripts
                .get_mut(&source.to_string())
                .and_then(VecDeque::pop_front);
            (index, queued.or_else(|| inner.fallback.clone()))
        };
        let state = Arc::clone(&self.inner);
        let label = source.to_string();
        async move {
            let mut guard = CallGuard {
                state,
                index,
                completed: false,
            };
            let res = match script {
                Some(script) => play(script, &mut progress, &cancel).await,
                None => Err(FetchError::Network(format!("no script for {label}"))),
            };
            guard.completed = true;
            res
        }
        .boxed()
    }
}
