// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs port shared across Dolly tools.

use tracing::{debug, warn};

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::{PreviewPrefs, PREFS_KEY};

/// Loading/saving previewer preferences.
pub trait PrefsPort {
    /// Load preferences (None if missing or unreadable).
    fn load_prefs(&self) -> Option<PreviewPrefs>;
    /// Persist preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &PreviewPrefs);
}

impl<S: ConfigStore> PrefsPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<PreviewPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "failed to load prefs");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &PreviewPrefs) {
        match self.save(PREFS_KEY, prefs) {
            Ok(()) => debug!("prefs saved"),
            Err(err) => warn!(%err, "failed to save prefs"),
        }
    }
}
