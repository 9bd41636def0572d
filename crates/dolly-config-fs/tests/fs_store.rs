// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]

use dolly_app_core::config::{ConfigService, ConfigStore};
use dolly_app_core::prefs::PreviewPrefs;
use dolly_app_core::prefs_port::PrefsPort;
use dolly_config_fs::FsConfigStore;

#[test]
fn prefs_persist_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();

    let mut prefs = PreviewPrefs::default();
    prefs.shot.fov_deg = 35.0;
    prefs.loader.base_url = Some("https://cdn.example.test/".into());
    ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap()).save_prefs(&prefs);

    let reopened = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
    assert_eq!(reopened.load_prefs(), Some(prefs));
    assert!(dir.path().join("preview_prefs.json").exists());
    assert!(!dir.path().join("preview_prefs.json.tmp").exists());
}

#[test]
fn raw_blobs_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    store.save_raw("k", b"1").unwrap();
    store.save_raw("k", b"22").unwrap();
    assert_eq!(store.load_raw("k").unwrap(), b"22");
    let v: u32 = serde_json::from_slice(&store.load_raw("k").unwrap()).unwrap();
    assert_eq!(v, 22);
}
