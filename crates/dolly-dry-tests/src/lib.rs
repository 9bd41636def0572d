// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Dolly crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`fetcher`] - Scripted fetcher with controllable timing and cancellation records
//! - [`progress`] - Progress sink that records every call
//! - [`target`] - Render target that records assignments and holds acknowledgments

pub mod config;
pub mod fetcher;
pub mod progress;
pub mod target;

pub use config::InMemoryConfigStore;
pub use fetcher::{FetchCall, FetchScript, ScriptStep, ScriptedFetcher};
pub use progress::{RecordingSink, SinkCall};
pub use target::{AckMode, Assignment, MockTarget, MockTargetProbe};
