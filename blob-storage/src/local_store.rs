use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;
use crate::error::{BlobError, BlobResult};
use crate::store::{BlobHandle, BlobStore, DeleteOutcome};

/// Stores each blob as `{root}/{id}{extension}` and finds it again by
/// scanning the root for file names starting with the id.
#[derive(Debug, Clone)]
pub struct LocalFileBlobStore {
    root: PathBuf,
}

impl LocalFileBlobStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    /// Relative roots are resolved against the current working directory.
    pub fn open(root: impl AsRef<Path>) -> BlobResult<Self> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        let root = normalize(&absolute);
        fs::create_dir_all(&root)?;
        tracing::info!("Blob storage root at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `payload` under a new id and returns the id together with the
    /// name of the file it landed in.
    pub(crate) fn write_blob(&self, payload: &[u8], original_name: Option<&str>) -> BlobResult<(Uuid, String)> {
        if payload.is_empty() {
            return Err(BlobError::InvalidArgument("empty file".to_string()));
        }

        let id = Uuid::new_v4();
        let target = normalize(&self.root.join(format!("{}{}", id, extension_of(original_name))));

        // Anything that resolves outside the root itself is refused before touching disk.
        if target.parent() != Some(self.root.as_path()) {
            tracing::warn!("Rejected upload named {:?}: path escapes storage root", original_name);
            return Err(BlobError::SecurityViolation("invalid path".to_string()));
        }
        let file_name = match target.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Err(BlobError::SecurityViolation("invalid path".to_string())),
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target)?;
        file.write_all(payload)?;
        tracing::debug!("Stored {} ({} bytes)", file_name, payload.len());
        Ok((id, file_name))
    }

    /// File names of every immediate entry of the root.
    pub(crate) fn file_names(&self) -> io::Result<Vec<String>> {
        Ok(fs::read_dir(&self.root)?
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect())
    }

    fn matching(&self, id: &Uuid) -> io::Result<impl Iterator<Item = fs::DirEntry>> {
        let prefix = id.to_string();
        Ok(fs::read_dir(&self.root)?
            .filter_map(Result::ok)
            .filter(move |entry| entry.file_name().to_string_lossy().starts_with(&prefix)))
    }
}

impl BlobStore for LocalFileBlobStore {
    fn save(&self, payload: &[u8], original_name: Option<&str>) -> BlobResult<Uuid> {
        self.write_blob(payload, original_name).map(|(id, _)| id)
    }

    fn load(&self, id: &Uuid) -> BlobResult<BlobHandle> {
        let entry = self.matching(id)?
            .next()
            .ok_or(BlobError::NotFound(*id))?;
        open_blob(id, entry.file_name().to_string_lossy().into_owned(), entry.path())
    }

    fn delete(&self, id: &Uuid) -> BlobResult<DeleteOutcome> {
        let mut outcome = DeleteOutcome::default();
        for entry in self.matching(id)? {
            remove_blob_file(&entry.path(), &mut outcome);
        }
        Ok(outcome)
    }

    fn exists(&self, id: &Uuid) -> bool {
        self.matching(id)
            .map(|mut found| found.next().is_some())
            .unwrap_or(false)
    }
}

/// Opens a matched file. A match that is gone or unreadable by the time it is
/// opened counts as not found.
pub(crate) fn open_blob(id: &Uuid, file_name: String, path: PathBuf) -> BlobResult<BlobHandle> {
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!("Blob {} matched {} but could not be opened: {}", id, path.display(), e);
            return Err(BlobError::NotFound(*id));
        }
    };
    match file.metadata() {
        Ok(meta) if meta.is_file() => Ok(BlobHandle { id: *id, file_name, path, file }),
        _ => Err(BlobError::NotFound(*id)),
    }
}

/// Removes one matched entry, an empty directory included. Returns `true` when
/// the entry is still on disk afterwards.
pub(crate) fn remove_blob_file(path: &Path, outcome: &mut DeleteOutcome) -> bool {
    let removal = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir(path),
        _ => fs::remove_file(path),
    };
    match removal {
        Ok(()) => {
            outcome.removed += 1;
            tracing::debug!("Removed {}", path.display());
            false
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            outcome.failed += 1;
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
            true
        }
    }
}

/// Everything from the last `.` of the original name, or nothing.
fn extension_of(original_name: Option<&str>) -> &str {
    original_name
        .and_then(|name| name.rfind('.').map(|dot| &name[dot..]))
        .unwrap_or("")
}

/// Lexical normalization: drops `.` and resolves `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
