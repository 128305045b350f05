use std::path::PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
    #[clap(long, env = "FILE_SERVER_HTTP_ADDR", default_value = "127.0.0.1:8080")]
    pub(crate) http_addr: String,
    /// Directory blobs are stored in; created at startup if missing.
    #[clap(long, env = "FILE_SERVER_STORAGE_ROOT", default_value = "uploads")]
    pub(crate) storage_root: PathBuf,
    #[clap(long, env = "FILE_SERVER_MAX_UPLOAD_BYTES", default_value_t = 64 * 1024 * 1024)]
    pub(crate) max_upload_bytes: usize,
    /// Keep an in-memory id index instead of scanning the storage root on every lookup.
    #[clap(long, env = "FILE_SERVER_INDEX")]
    pub(crate) index: bool,
}
