// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ConfigService and PrefsPort behavior over a map-backed store.
#![allow(missing_docs, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::HashMap;

use dolly_app_core::config::{ConfigError, ConfigService, ConfigStore};
use dolly_app_core::prefs::{PreviewPrefs, ReadModePref, PREFS_KEY};
use dolly_app_core::prefs_port::PrefsPort;

#[derive(Default)]
struct MapStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
    fail_saves: bool,
}

impl ConfigStore for MapStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        if self.fail_saves {
            return Err(ConfigError::Other("read-only".into()));
        }
        self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[test]
fn missing_key_is_none_and_default() {
    let svc = ConfigService::new(MapStore::default());
    assert!(svc.load::<PreviewPrefs>(PREFS_KEY).unwrap().is_none());
    assert_eq!(svc.load_or_default::<PreviewPrefs>(PREFS_KEY), PreviewPrefs::default());
    assert!(svc.load_prefs().is_none());
}

#[test]
fn prefs_round_trip_through_port() {
    let svc = ConfigService::new(MapStore::default());
    let mut prefs = PreviewPrefs::default();
    prefs.shot.style = "CRANE".into();
    prefs.loader.read_mode = ReadModePref::Bulk;
    prefs.loader.last_remote = Some("models/a.glb".into());
    svc.save_prefs(&prefs);
    assert_eq!(svc.load_prefs(), Some(prefs));
}

#[test]
fn corrupt_blob_falls_back_to_default() {
    let store = MapStore::default();
    store
        .blobs
        .borrow_mut()
        .insert(PREFS_KEY.into(), b"{not json".to_vec());
    let svc = ConfigService::new(store);
    assert!(matches!(
        svc.load::<PreviewPrefs>(PREFS_KEY),
        Err(ConfigError::Serde(_))
    ));
    assert_eq!(svc.load_or_default::<PreviewPrefs>(PREFS_KEY), PreviewPrefs::default());
    assert!(svc.load_prefs().is_none());
}

#[test]
fn failed_save_is_logged_not_raised() {
    let svc = ConfigService::new(MapStore {
        fail_saves: true,
        ..MapStore::default()
    });
    svc.save_prefs(&PreviewPrefs::default());
    let store = svc.into_inner();
    assert!(store.blobs.borrow().is_empty());
}
