// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ticketed asset loading for Dolly.
//!
//! The [`LoadCoordinator`] owns the render target and progress sink and makes
//! sure only the most recent request can touch them. [`AssetFetcher`] streams
//! bytes from HTTP or disk; blob handles are tracked so each one is released
//! exactly once.

pub mod blob;
pub mod coordinator;
pub mod deeplink;
pub mod fetch;
pub mod manifest;
pub mod source;
pub mod ticket;

pub use blob::{BlobRegistry, BlobSlots};
pub use coordinator::{LoadCoordinator, LoadOutcome, LoadPhase, LoaderConfig};
pub use fetch::{
    AssetFetcher, CancelToken, FetchError, FetchProgress, Fetcher, ProgressFn, ReadMode,
};
pub use manifest::{load_manifest, parse_manifest, ManifestEntry, ManifestError};
pub use source::AssetSource;
pub use ticket::{Ticket, TicketCounter};
