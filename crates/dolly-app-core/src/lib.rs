// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Dolly tools (config, prefs, progress).
//! Keeps loader/CLI adapters thin and framework-agnostic.

pub mod config;
pub mod prefs;
pub mod prefs_port;
pub mod progress;
