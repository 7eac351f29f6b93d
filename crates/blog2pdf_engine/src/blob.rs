use std::collections::HashMap;

use bytes::Bytes;
use engine_logging::engine_debug;

use crate::ConversionOutput;

pub type BlobId = u64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlobError {
    #[error("unknown or already released blob {0}")]
    Unknown(BlobId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub filename: String,
    pub source_url: String,
}

impl From<ConversionOutput> for StoredBlob {
    fn from(output: ConversionOutput) -> Self {
        Self {
            bytes: output.bytes,
            filename: output.filename,
            source_url: output.source_url,
        }
    }
}

/// Owns downloaded documents behind opaque ids until they are released.
///
/// Ids are never reused, so a released id stays invalid.
#[derive(Debug, Default)]
pub struct BlobStore {
    last_id: BlobId,
    blobs: HashMap<BlobId, StoredBlob>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, blob: StoredBlob) -> BlobId {
        self.last_id += 1;
        let id = self.last_id;
        engine_debug!("blob {} stored ({} bytes)", id, blob.bytes.len());
        self.blobs.insert(id, blob);
        id
    }

    pub fn get(&self, id: BlobId) -> Option<&StoredBlob> {
        self.blobs.get(&id)
    }

    pub fn release(&mut self, id: BlobId) -> Result<StoredBlob, BlobError> {
        let blob = self.blobs.remove(&id).ok_or(BlobError::Unknown(id))?;
        engine_debug!("blob {} released ({} bytes)", id, blob.bytes.len());
        Ok(blob)
    }

    /// Drops every stored blob and returns how many were held.
    pub fn release_all(&mut self) -> usize {
        let count = self.blobs.len();
        self.blobs.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.blobs.values().map(|blob| blob.bytes.len() as u64).sum()
    }
}
