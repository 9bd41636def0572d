// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Load coordinator: turns overlapping load requests into one current load.
//!
//! The coordinator is owned by a single task. Fetch tasks, render
//! acknowledgments and timeouts never touch its state; they send
//! ticket-tagged events over a channel, and the owner applies them one at a
//! time via [`LoadCoordinator::pump`] or [`LoadCoordinator::next_outcome`].
//! Every event is checked against the active ticket before it can change
//! anything, so a superseded load can neither move the progress overlay nor
//! install an asset.
//!
//! A ticket resolves at most once. The first of {render ready, render
//! error, fetch failure, forced timeout} wins; resolving clears the active
//! slot, aborts the remaining fetch and timeout tasks, and any late events
//! for that ticket fall through the stale check.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use bytes::Bytes;
use dolly_app_core::progress::{Percent, ProgressSink};
use dolly_scene_port::{BlobHandle, BlobKind, OrbitConfig, RenderAck, RenderOutcome, RenderTarget};
use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::blob::{BlobRegistry, BlobSlots};
use crate::fetch::{CancelToken, FetchError, FetchProgress, Fetcher, ProgressFn};
use crate::source::AssetSource;
use crate::ticket::{Ticket, TicketCounter};

/// Overlay message while the request is being opened.
pub const MSG_CONNECTING: &str = "Connecting";
/// Overlay message while bytes arrive.
pub const MSG_DOWNLOADING: &str = "Downloading";
/// Overlay message while the render target installs the asset.
pub const MSG_INSTALLING: &str = "Loading model";
/// Failure reason for render-side errors; the detail only goes to the log.
pub const MSG_RENDER_FAILED: &str = "Load failed";

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Ceiling between installing an asset and forcing Ready.
    pub timeout: Duration,
    /// Orbit handed to the target with every assignment and on reset.
    pub initial_orbit: OrbitConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            initial_orbit: OrbitConfig::default(),
        }
    }
}

/// Observable state of the current load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase {
    /// Nothing requested yet.
    Idle,
    /// Request opened, no bytes yet.
    Connecting(Ticket),
    /// Bytes arriving.
    Downloading {
        /// Current ticket.
        ticket: Ticket,
        /// Bytes received so far.
        received: u64,
        /// Total size if known.
        total: Option<u64>,
    },
    /// Bytes handed to the render target; waiting for its acknowledgment.
    Decoding(Ticket),
    /// Asset displayed. `confirmed` is false when the timeout forced it.
    Ready {
        /// Resolved ticket.
        ticket: Ticket,
        /// Whether the render target acknowledged.
        confirmed: bool,
    },
    /// Load failed; the previously displayed asset is untouched.
    Failed {
        /// Resolved ticket.
        ticket: Ticket,
        /// Human-readable reason shown in the overlay.
        reason: String,
    },
}

/// Terminal result of one ticket.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Asset displayed.
    Ready {
        /// Resolved ticket.
        ticket: Ticket,
        /// False when forced by the timeout.
        confirmed: bool,
    },
    /// Load failed.
    Failed {
        /// Resolved ticket.
        ticket: Ticket,
        /// Reason shown to the user.
        reason: String,
    },
}

impl LoadOutcome {
    /// Ticket this outcome resolves.
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Ready { ticket, .. } | Self::Failed { ticket, .. } => *ticket,
        }
    }

    /// Whether the asset is on screen.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

enum LoadEvent {
    Progress(FetchProgress),
    Fetched(Result<Bytes, FetchError>),
    Rendered(RenderOutcome),
    TimedOut,
}

struct TicketEvent {
    ticket: Ticket,
    event: LoadEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Fetching,
    Installing,
}

struct ActiveLoad {
    ticket: Ticket,
    kind: BlobKind,
    label: String,
    stage: Stage,
    cancel: CancelToken,
    fetch: Option<JoinHandle<()>>,
    timeout: Option<JoinHandle<()>>,
    pending: Option<BlobHandle>,
}

impl ActiveLoad {
    /// Stop every continuation still able to report for this ticket.
    fn deregister(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.fetch.take() {
            task.abort();
        }
        if let Some(task) = self.timeout.take() {
            task.abort();
        }
    }
}

/// Serializes load requests against one render target and one progress sink.
///
/// Must be used from within a tokio runtime: `begin_load` spawns the fetch.
pub struct LoadCoordinator<F: Fetcher, S: ProgressSink, T: RenderTarget> {
    fetcher: F,
    sink: S,
    target: T,
    config: LoaderConfig,
    tickets: TicketCounter,
    active: Option<ActiveLoad>,
    phase: LoadPhase,
    registry: BlobRegistry,
    slots: BlobSlots,
    tx: mpsc::UnboundedSender<TicketEvent>,
    rx: mpsc::UnboundedReceiver<TicketEvent>,
    torn_down: bool,
}

impl<F: Fetcher, S: ProgressSink, T: RenderTarget> LoadCoordinator<F, S, T> {
    /// Coordinator with an idle phase and empty slots.
    pub fn new(fetcher: F, sink: S, target: T, config: LoaderConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            sink,
            target,
            config,
            tickets: TicketCounter::new(),
            active: None,
            phase: LoadPhase::Idle,
            registry: BlobRegistry::new(),
            slots: BlobSlots::default(),
            tx,
            rx,
            torn_down: false,
        }
    }

    /// Start loading `source`, superseding any load in flight.
    ///
    /// Returns immediately; progress and the outcome arrive through
    /// [`pump`](Self::pump) / [`next_outcome`](Self::next_outcome).
    pub fn begin_load(&mut self, source: AssetSource) -> Ticket {
        let ticket = self.tickets.issue();
        if let Some(prev) = self.active.take() {
            debug!(old = %prev.ticket, new = %ticket, "load superseded");
            self.abandon(prev);
        }
        if self.torn_down {
            warn!(%ticket, %source, "load requested after teardown");
            self.phase = LoadPhase::Failed {
                ticket,
                reason: "Loader closed".into(),
            };
            return ticket;
        }

        debug!(%ticket, %source, "load begin");
        self.sink.show(Percent::Known(0.0), MSG_CONNECTING);

        let cancel = CancelToken::new();
        let progress_tx = self.tx.clone();
        let progress: ProgressFn = Box::new(move |p| {
            let _ = progress_tx.send(TicketEvent {
                ticket,
                event: LoadEvent::Progress(p),
            });
        });
        let work = self.fetcher.fetch(&source, progress, cancel.clone());
        let done_tx = self.tx.clone();
        let fetch = tokio::spawn(async move {
            // A panicking fetcher still has to resolve its ticket.
            let res = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(res) => res,
                Err(_) => {
                    warn!(%ticket, "fetch task panicked");
                    Err(FetchError::Network("fetch task failed".into()))
                }
            };
            let _ = done_tx.send(TicketEvent {
                ticket,
                event: LoadEvent::Fetched(res),
            });
        });

        self.active = Some(ActiveLoad {
            ticket,
            kind: source.kind(),
            label: source.label(),
            stage: Stage::Fetching,
            cancel,
            fetch: Some(fetch),
            timeout: None,
            pending: None,
        });
        self.phase = LoadPhase::Connecting(ticket);
        ticket
    }

    /// Apply every queued event without waiting. Returns outcomes in order.
    pub fn pump(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            if let Some(outcome) = self.apply(ev) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Wait for the current load to resolve. `None` if nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<LoadOutcome> {
        while self.active.is_some() {
            let ev = self.rx.recv().await?;
            if let Some(outcome) = self.apply(ev) {
                return Some(outcome);
            }
        }
        None
    }

    /// Wait for the current load, then drain whatever else is already queued.
    ///
    /// Anything drained afterwards belongs to resolved or superseded tickets
    /// and is discarded by the stale check.
    pub async fn settle(&mut self) -> Option<LoadOutcome> {
        let outcome = self.next_outcome().await;
        let late = self.pump();
        debug_assert!(late.is_empty());
        outcome
    }

    fn apply(&mut self, ev: TicketEvent) -> Option<LoadOutcome> {
        let TicketEvent { ticket, event } = ev;
        let Some(active) = self.active.as_mut().filter(|a| a.ticket == ticket) else {
            trace!(%ticket, "stale event dropped");
            return None;
        };

        match event {
            LoadEvent::Progress(p) => {
                if active.stage == Stage::Fetching {
                    self.sink.show(p.percent, MSG_DOWNLOADING);
                    self.phase = LoadPhase::Downloading {
                        ticket,
                        received: p.received,
                        total: p.total,
                    };
                }
                None
            }
            LoadEvent::Fetched(Ok(bytes)) => {
                active.stage = Stage::Installing;
                active.fetch = None;
                let handle = self.registry.create(active.kind, &active.label, bytes);
                active.pending = Some(handle.clone());

                let ack_tx = self.tx.clone();
                let ack = RenderAck::new(move |outcome| {
                    let _ = ack_tx.send(TicketEvent {
                        ticket,
                        event: LoadEvent::Rendered(outcome),
                    });
                });
                let timeout_tx = self.tx.clone();
                let ceiling = self.config.timeout;
                active.timeout = Some(tokio::spawn(async move {
                    tokio::time::sleep(ceiling).await;
                    let _ = timeout_tx.send(TicketEvent {
                        ticket,
                        event: LoadEvent::TimedOut,
                    });
                }));

                debug!(%ticket, blob = %handle.id(), len = handle.len(), "installing");
                self.sink.show(Percent::Known(100.0), MSG_INSTALLING);
                self.phase = LoadPhase::Decoding(ticket);
                self.target.assign(&handle, &self.config.initial_orbit, ack);
                None
            }
            LoadEvent::Fetched(Err(err)) => {
                warn!(%ticket, %err, "fetch failed");
                self.fail(err.to_string())
            }
            LoadEvent::Rendered(RenderOutcome::Ready) => self.succeed(true),
            LoadEvent::Rendered(RenderOutcome::Error(err)) => {
                warn!(%ticket, %err, "render target rejected asset");
                self.fail(MSG_RENDER_FAILED.to_owned())
            }
            LoadEvent::TimedOut => {
                warn!(
                    %ticket,
                    ceiling = ?self.config.timeout,
                    "no render acknowledgment; forcing ready"
                );
                self.succeed(false)
            }
        }
    }

    fn succeed(&mut self, confirmed: bool) -> Option<LoadOutcome> {
        let mut active = self.active.take()?;
        active.deregister();
        if let Some(blob) = active.pending.take() {
            if let Some(prev) = self.slots.install(blob) {
                self.registry.release(&prev);
            }
        }
        self.target.refresh();
        self.sink.hide();
        info!(ticket = %active.ticket, label = %active.label, confirmed, "load ready");
        self.phase = LoadPhase::Ready {
            ticket: active.ticket,
            confirmed,
        };
        Some(LoadOutcome::Ready {
            ticket: active.ticket,
            confirmed,
        })
    }

    fn fail(&mut self, reason: String) -> Option<LoadOutcome> {
        let mut active = self.active.take()?;
        active.deregister();
        if let Some(blob) = active.pending.take() {
            self.registry.release(&blob);
        }
        self.sink.fail(&reason);
        info!(ticket = %active.ticket, %reason, "load failed");
        self.phase = LoadPhase::Failed {
            ticket: active.ticket,
            reason: reason.clone(),
        };
        Some(LoadOutcome::Failed {
            ticket: active.ticket,
            reason,
        })
    }

    /// Drop a superseded load without touching the overlay or the target.
    fn abandon(&mut self, mut load: ActiveLoad) {
        load.deregister();
        if let Some(blob) = load.pending.take() {
            self.registry.release(&blob);
        }
    }

    /// Re-apply the initial orbit to the render target.
    pub fn reset_view(&mut self) {
        self.target.set_orbit(&self.config.initial_orbit);
    }

    /// Release every blob, abort the transfer in flight and dispose the target.
    ///
    /// Idempotent. Also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(active) = self.active.take() {
            debug!(ticket = %active.ticket, "load aborted by teardown");
            self.abandon(active);
        }
        for blob in self.slots.take_all() {
            self.registry.release(&blob);
        }
        self.target.dispose();
        self.sink.hide();
        debug!(
            created = self.registry.created_count(),
            released = self.registry.released_count(),
            "loader torn down"
        );
    }

    /// Current phase.
    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Ticket of the load in flight, if any.
    pub fn current_ticket(&self) -> Option<Ticket> {
        self.active.as_ref().map(|a| a.ticket)
    }

    /// Displayed blob of `kind`.
    pub fn displayed(&self, kind: BlobKind) -> Option<&BlobHandle> {
        self.slots.get(kind)
    }

    /// Blob bookkeeping.
    pub fn registry(&self) -> &BlobRegistry {
        &self.registry
    }

    /// Settings in use.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Progress sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Render target, for per-frame camera updates.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Whether [`teardown`](Self::teardown) ran.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<F: Fetcher, S: ProgressSink, T: RenderTarget> Drop for LoadCoordinator<F, S, T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
