mod errors;
mod params;
mod services;

use std::sync::Arc;
use actix_web::{middleware, web, App, HttpServer};
use blob_store::{BlobStore, IndexedBlobStore, LocalFileBlobStore};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use crate::params::Args;
use crate::services::file_service::{self, AppState};


#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The storage root must exist before any request is served.
    let store: Arc<dyn BlobStore> = if args.index {
        Arc::new(IndexedBlobStore::open(&args.storage_root).map_err(std::io::Error::other)?)
    } else {
        Arc::new(LocalFileBlobStore::open(&args.storage_root).map_err(std::io::Error::other)?)
    };
    tracing::info!(
        "Serving {} on {} (index: {}, upload limit: {} bytes)",
        args.storage_root.display(),
        args.http_addr,
        args.index,
        args.max_upload_bytes
    );

    let state = web::Data::new(AppState {
        store,
        max_upload_bytes: args.max_upload_bytes,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(file_service::configure)
    })
        .bind(args.http_addr.clone())?
        .run()
        .await
}
