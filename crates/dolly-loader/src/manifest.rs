// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Remote asset manifest: ordered `{label, url}` entries for the source picker.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::fetch::{CancelToken, FetchError, Fetcher};
use crate::source::AssetSource;

/// One pickable remote asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Display name.
    pub label: String,
    /// Absolute URL or path relative to the base URL.
    pub url: String,
}

impl ManifestEntry {
    /// Load request for this entry.
    pub fn source(&self) -> AssetSource {
        AssetSource::Remote(self.url.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestDoc {
    List(Vec<ManifestEntry>),
    Wrapped { models: Vec<ManifestEntry> },
}

/// Manifest loading failure.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest could not be fetched.
    #[error("manifest fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// Manifest is not a list of `{label, url}` entries.
    #[error("manifest is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a manifest: either a bare array or `{ "models": [...] }`.
pub fn parse_manifest(bytes: &[u8]) -> Result<Vec<ManifestEntry>, ManifestError> {
    let doc: ManifestDoc = serde_json::from_slice(bytes)?;
    Ok(match doc {
        ManifestDoc::List(entries) | ManifestDoc::Wrapped { models: entries } => entries,
    })
}

/// Fetch and parse a manifest.
pub async fn fetch_manifest<F: Fetcher + ?Sized>(
    fetcher: &F,
    location: &AssetSource,
) -> Result<Vec<ManifestEntry>, ManifestError> {
    let bytes = fetcher
        .fetch(location, Box::new(|_| {}), CancelToken::new())
        .await?;
    parse_manifest(&bytes)
}

/// Like [`fetch_manifest`], but a missing or broken manifest yields an empty list.
pub async fn load_manifest<F: Fetcher + ?Sized>(
    fetcher: &F,
    location: &AssetSource,
) -> Vec<ManifestEntry> {
    match fetch_manifest(fetcher, location).await {
        Ok(entries) => {
            debug!(%location, count = entries.len(), "manifest loaded");
            entries
        }
        Err(err) => {
            warn!(%location, %err, "no manifest; source picker stays empty");
            Vec::new()
        }
    }
}
