// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Revocable byte-buffer handles handed to render targets.

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Identifier of a blob handle. Never reused within a registry.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlobId(pub u64);

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:{}", self.0)
    }
}

/// Where the bytes came from. The coordinator keeps one displayed handle per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlobKind {
    /// Fetched over the network.
    Remote,
    /// Read from a local file.
    Local,
}

/// Cheap-to-clone view of a fetched asset.
///
/// Cloning does not extend the handle's validity: once the issuing registry
/// releases the id, targets must treat the handle as revoked.
#[derive(Clone)]
pub struct BlobHandle {
    id: BlobId,
    kind: BlobKind,
    label: Arc<str>,
    bytes: Bytes,
}

impl BlobHandle {
    /// Wrap fetched bytes. Registries are the only expected callers.
    pub fn new(id: BlobId, kind: BlobKind, label: impl Into<Arc<str>>, bytes: Bytes) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            bytes,
        }
    }

    /// Handle identifier.
    pub fn id(&self) -> BlobId {
        self.id
    }

    /// Source kind.
    pub fn kind(&self) -> BlobKind {
        self.kind
    }

    /// Human-readable origin (URL or file name).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw asset bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("len", &self.bytes.len())
            .finish()
    }
}
