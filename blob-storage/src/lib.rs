//! Identifier-addressed blob storage on a local filesystem.
//!
//! Every blob is written under a freshly generated UUID, optionally followed by
//! the extension of the name it was uploaded with. Lookups match on the UUID
//! prefix of the stored file name.
//!
//! | Store                | Lookup cost            |
//! |----------------------|------------------------|
//! | `LocalFileBlobStore` | directory scan per call |
//! | `IndexedBlobStore`   | in-memory index         |

mod error;
mod store;

#[cfg(test)]
mod testing;

pub mod indexed_store;
pub mod local_store;

pub use error::{BlobError, BlobResult};
pub use indexed_store::IndexedBlobStore;
pub use local_store::LocalFileBlobStore;
pub use store::{BlobHandle, BlobStore, DeleteOutcome};
pub use uuid::Uuid;
