// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Byte fetching with progress and cancellation.
//!
//! [`Fetcher`] is the seam the coordinator drives; [`AssetFetcher`] is the
//! production implementation (reqwest for remote sources, tokio fs for local
//! files). Remote bodies are either streamed chunk by chunk, reporting after
//! every chunk, or read in one piece with a single 100% report.

use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use dolly_app_core::progress::Percent;
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use reqwest::{Client, Url};
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::source::AssetSource;

/// One progress report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchProgress {
    /// Completion, indeterminate when the total is unknown.
    pub percent: Percent,
    /// Bytes received so far.
    pub received: u64,
    /// Total size if the server reported one.
    pub total: Option<u64>,
}

impl FetchProgress {
    /// Report for `received` of `total` bytes.
    pub fn new(received: u64, total: Option<u64>) -> Self {
        Self {
            percent: Percent::from_counts(received, total),
            received,
            total,
        }
    }

    /// Single report for a payload read in one piece.
    pub fn complete(len: u64) -> Self {
        Self {
            percent: Percent::Known(100.0),
            received: len,
            total: Some(len),
        }
    }
}

/// Fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Server answered with a non-success status.
    #[error("HTTP {status} {reason}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase (may be empty).
        reason: String,
    },
    /// Connection or body transfer failed.
    #[error("network error: {0}")]
    Network(String),
    /// Local file could not be read.
    #[error("read failed: {0}")]
    Io(String),
    /// The request was cancelled.
    #[error("cancelled")]
    Cancelled,
    /// Source could not be turned into a URL.
    #[error("invalid url `{0}`")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Token that is not cancelled.
    pub fn new() -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once cancellation is requested.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so `wait_for` cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Progress callback handed to a fetch.
pub type ProgressFn = Box<dyn FnMut(FetchProgress) + Send>;

/// Source of asset bytes.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetch `source`, calling `progress` as bytes arrive.
    ///
    /// Must resolve with [`FetchError::Cancelled`] promptly after `cancel` fires.
    fn fetch(
        &self,
        source: &AssetSource,
        progress: ProgressFn,
        cancel: CancelToken,
    ) -> BoxFuture<'static, Result<Bytes, FetchError>>;
}

/// How remote bodies are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Stream and report after every chunk.
    #[default]
    Chunked,
    /// Read the whole body, report once.
    Bulk,
}

/// Production fetcher: HTTP(S) via reqwest, files via tokio.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: Client,
    base: Option<Url>,
    mode: ReadMode,
}

impl AssetFetcher {
    /// Fetcher with a fresh HTTP client.
    pub fn new(mode: ReadMode) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("dolly/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, mode))
    }

    /// Fetcher over an existing client.
    pub fn with_client(client: Client, mode: ReadMode) -> Self {
        Self {
            client,
            base: None,
            mode,
        }
    }

    /// Resolve relative remote paths against `base`.
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    /// Read mode in use.
    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Absolute URL for a remote path.
    pub fn resolve(&self, remote: &str) -> Result<Url, FetchError> {
        match Url::parse(remote) {
            Ok(url) => Ok(url),
            Err(_) => self
                .base
                .as_ref()
                .and_then(|base| base.join(remote).ok())
                .ok_or_else(|| FetchError::InvalidUrl(remote.to_owned())),
        }
    }
}

impl Fetcher for AssetFetcher {
    fn fetch(
        &self,
        source: &AssetSource,
        progress: ProgressFn,
        cancel: CancelToken,
    ) -> BoxFuture<'static, Result<Bytes, FetchError>> {
        let work: BoxFuture<'static, Result<Bytes, FetchError>> = match source {
            AssetSource::Remote(remote) => match self.resolve(remote) {
                Ok(url) => fetch_remote(self.client.clone(), url, self.mode, progress).boxed(),
                Err(err) => futures_util::future::ready(Err(err)).boxed(),
            },
            AssetSource::Local(path) => fetch_local(path.clone(), progress).boxed(),
        };
        async move {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(FetchError::Cancelled),
                res = work => res,
            }
        }
        .boxed()
    }
}

async fn fetch_remote(
    client: Client,
    url: Url,
    mode: ReadMode,
    mut progress: ProgressFn,
) -> Result<Bytes, FetchError> {
    debug!(%url, ?mode, "fetch start");
    let response = client.get(url).send().await?.error_for_status()?;
    let total = response.content_length().filter(|&n| n > 0);

    match mode {
        ReadMode::Bulk => {
            let body = response.bytes().await?;
            progress(FetchProgress::complete(body.len() as u64));
            Ok(body)
        }
        ReadMode::Chunked => {
            let capacity = total.map_or(0, |n| n.min(64 * 1024 * 1024) as usize);
            let mut buf = BytesMut::with_capacity(capacity);
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                buf.extend_from_slice(&chunk);
                progress(FetchProgress::new(buf.len() as u64, total));
            }
            Ok(buf.freeze())
        }
    }
}

async fn fetch_local(
    path: impl AsRef<Path>,
    mut progress: ProgressFn,
) -> Result<Bytes, FetchError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "read start");
    let data = tokio::fs::read(path)
        .await
        .map_err(|err| FetchError::Io(format!("{}: {err}", path.display())))?;
    progress(FetchProgress::complete(data.len() as u64));
    Ok(Bytes::from(data))
}
