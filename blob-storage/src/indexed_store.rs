use std::path::Path;
use dashmap::DashMap;
use uuid::Uuid;
use crate::error::{BlobError, BlobResult};
use crate::local_store::{open_blob, remove_blob_file, LocalFileBlobStore};
use crate::store::{BlobHandle, BlobStore, DeleteOutcome};

/// Length of a hyphenated UUID.
const ID_LEN: usize = 36;

/// A [`LocalFileBlobStore`] fronted by an in-memory id -> file name index.
///
/// The index is rebuilt from one directory scan when the store is opened and
/// kept current by `save` and `delete`, so lookups never list the root.
/// This only holds while nothing else writes under the root.
pub struct IndexedBlobStore {
    files: LocalFileBlobStore,
    index: DashMap<Uuid, Vec<String>>,
}

impl IndexedBlobStore {
    pub fn open(root: impl AsRef<Path>) -> BlobResult<Self> {
        let files = LocalFileBlobStore::open(root)?;
        let index: DashMap<Uuid, Vec<String>> = DashMap::new();
        for name in files.file_names()? {
            if let Some(id) = parse_id_prefix(&name) {
                index.entry(id).or_default().push(name);
            }
        }
        tracing::info!("Indexed {} blobs under {}", index.len(), files.root().display());
        Ok(Self { files, index })
    }

    pub fn root(&self) -> &Path {
        self.files.root()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl BlobStore for IndexedBlobStore {
    fn save(&self, payload: &[u8], original_name: Option<&str>) -> BlobResult<Uuid> {
        let (id, file_name) = self.files.write_blob(payload, original_name)?;
        self.index.entry(id).or_default().push(file_name);
        Ok(id)
    }

    fn load(&self, id: &Uuid) -> BlobResult<BlobHandle> {
        // Clone the name out so the shard lock is released before any I/O.
        let file_name = self.index
            .get(id)
            .and_then(|names| names.first().cloned())
            .ok_or(BlobError::NotFound(*id))?;
        let path = self.root().join(&file_name);
        open_blob(id, file_name, path)
    }

    fn delete(&self, id: &Uuid) -> BlobResult<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();
        if let Some((_, names)) = self.index.remove(id) {
            let left: Vec<String> = names
                .into_iter()
                .filter(|name| remove_blob_file(&self.root().join(name), &mut outcome))
                .collect();
            // Whatever is still on disk stays visible, so a later delete retries it.
            if !left.is_empty() {
                self.index.entry(*id).or_default().extend(left);
            }
        }
        Ok(outcome)
    }

    fn exists(&self, id: &Uuid) -> bool {
        self.index.contains_key(id)
    }
}

/// The id a stored file name starts with, in the same lowercase hyphenated
/// form the scan store matches on.
fn parse_id_prefix(file_name: &str) -> Option<Uuid> {
    let prefix = file_name.get(..ID_LEN)?;
    Uuid::parse_str(prefix)
        .ok()
        .filter(|id| id.to_string() == prefix)
}
