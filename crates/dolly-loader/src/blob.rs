// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Blob handle ownership.
//!
//! Every fetched payload becomes exactly one [`BlobHandle`] issued by a
//! [`BlobRegistry`], and every issued handle is released exactly once.
//! [`BlobSlots`] holds the handles currently on screen, one per kind.

use std::collections::BTreeSet;

use bytes::Bytes;
use dolly_scene_port::{BlobHandle, BlobId, BlobKind};
use tracing::{trace, warn};

/// Issues and revokes blob handles.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    next: u64,
    live: BTreeSet<BlobId>,
    released: u64,
}

impl BlobRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a handle for `bytes`.
    pub fn create(&mut self, kind: BlobKind, label: &str, bytes: Bytes) -> BlobHandle {
        self.next += 1;
        let id = BlobId(self.next);
        self.live.insert(id);
        trace!(%id, ?kind, label, len = bytes.len(), "blob created");
        BlobHandle::new(id, kind, label, bytes)
    }

    /// Revoke a handle. Returns `false` (and warns) if it was already released.
    pub fn release(&mut self, handle: &BlobHandle) -> bool {
        if self.live.remove(&handle.id()) {
            self.released += 1;
            trace!(id = %handle.id(), "blob released");
            true
        } else {
            warn!(id = %handle.id(), "blob released twice");
            false
        }
    }

    /// Whether `id` is still valid.
    pub fn is_live(&self, id: BlobId) -> bool {
        self.live.contains(&id)
    }

    /// Handles issued and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Handles issued so far.
    pub fn created_count(&self) -> u64 {
        self.next
    }

    /// Handles released so far.
    pub fn released_count(&self) -> u64 {
        self.released
    }
}

/// Displayed handles: at most one remote and one local.
#[derive(Debug, Default)]
pub struct BlobSlots {
    remote: Option<BlobHandle>,
    local: Option<BlobHandle>,
}

impl BlobSlots {
    fn slot_mut(&mut self, kind: BlobKind) -> &mut Option<BlobHandle> {
        match kind {
            BlobKind::Remote => &mut self.remote,
            BlobKind::Local => &mut self.local,
        }
    }

    /// Put `handle` in its kind's slot and return the handle it replaced.
    pub fn install(&mut self, handle: BlobHandle) -> Option<BlobHandle> {
        self.slot_mut(handle.kind()).replace(handle)
    }

    /// Displayed handle of `kind`.
    pub fn get(&self, kind: BlobKind) -> Option<&BlobHandle> {
        match kind {
            BlobKind::Remote => self.remote.as_ref(),
            BlobKind::Local => self.local.as_ref(),
        }
    }

    /// Empty both slots.
    pub fn take_all(&mut self) -> Vec<BlobHandle> {
        self.remote.take().into_iter().chain(self.local.take()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_exactly_once() {
        let mut reg = BlobRegistry::new();
        let a = reg.create(BlobKind::Remote, "a.glb", Bytes::from_static(b"a"));
        assert!(reg.is_live(a.id()));
        assert!(reg.release(&a));
        assert!(!reg.release(&a));
        assert!(!reg.is_live(a.id()));
        assert_eq!(reg.released_count(), 1);
        assert_eq!(reg.live_count(), 0);
    }

    #[test]
    fn slots_replace_per_kind() {
        let mut reg = BlobRegistry::new();
        let mut slots = BlobSlots::default();
        let r1 = reg.create(BlobKind::Remote, "r1", Bytes::new());
        let l1 = reg.create(BlobKind::Local, "l1", Bytes::new());
        let r2 = reg.create(BlobKind::Remote, "r2", Bytes::new());
        assert!(slots.install(r1.clone()).is_none());
        assert!(slots.install(l1.clone()).is_none());
        assert_eq!(slots.install(r2.clone()).map(|h| h.id()), Some(r1.id()));
        assert_eq!(slots.get(BlobKind::Local).map(BlobHandle::id), Some(l1.id()));
        let ids: Vec<BlobId> = slots.take_all().iter().map(BlobHandle::id).collect();
        assert_eq!(ids, vec![r2.id(), l1.id()]);
        assert!(slots.get(BlobKind::Remote).is_none());
    }
}
