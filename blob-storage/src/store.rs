use std::fs::File;
use std::path::PathBuf;
use uuid::Uuid;
use crate::error::BlobResult;

/// An opened blob, ready to be streamed. The payload is not read until the
/// caller reads from `file`.
#[derive(Debug)]
pub struct BlobHandle {
    pub id: Uuid,
    /// Name of the file on disk: the id plus any preserved extension.
    pub file_name: String,
    pub path: PathBuf,
    pub file: File,
}

/// Result of a best-effort delete.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: usize,
    /// Removals that failed and were suppressed.
    pub failed: usize,
}

impl DeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Identifier-addressed blob persistence.
pub trait BlobStore: Send + Sync {
    /// Persists `payload` under a new identifier. The extension of
    /// `original_name`, if any, is kept on the stored file name.
    fn save(&self, payload: &[u8], original_name: Option<&str>) -> BlobResult<Uuid>;

    /// Opens the blob stored under `id`.
    fn load(&self, id: &Uuid) -> BlobResult<BlobHandle>;

    /// Removes every file stored under `id`. Unknown ids are a no-op.
    fn delete(&self, id: &Uuid) -> BlobResult<DeleteOutcome>;

    fn exists(&self, id: &Uuid) -> bool;
}
