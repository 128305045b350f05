use std::sync::Arc;
use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{delete, get, head, post, web, HttpResponse};
use blob_store::{BlobError, BlobStore, Uuid};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use crate::errors::FileServerErr;

pub const FILES_ROUTE: &str = "/api/v8.4/files";

/// Multipart part carrying the upload.
const FILE_FIELD: &str = "file";

pub struct AppState {
    pub(crate) store: Arc<dyn BlobStore>,
    pub(crate) max_upload_bytes: usize,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FileUploadResponse {
    id: Uuid,
    download_url: String,
    size: usize,
}

struct Upload {
    payload: Vec<u8>,
    original_name: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(FILES_ROUTE)
            .service(upload_file)
            .service(download_file)
            .service(delete_file)
            .service(head_file),
    );
}

fn parse_id(raw: &str) -> Result<Uuid, FileServerErr> {
    Ok(Uuid::parse_str(raw)?)
}

fn multipart_err(e: impl std::fmt::Display) -> FileServerErr {
    FileServerErr::Multipart(e.to_string())
}

/// Reads the `file` part into memory, skipping any other parts.
async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<Upload, FileServerErr> {
    while let Some(mut field) = multipart.try_next().await.map_err(multipart_err)? {
        let (field_name, original_name) = match field.content_disposition() {
            Some(cd) => (cd.get_name().map(str::to_owned), cd.get_filename().map(str::to_owned)),
            None => (None, None),
        };

        if field_name.as_deref() != Some(FILE_FIELD) {
            while field.try_next().await.map_err(multipart_err)?.is_some() {}
            continue;
        }

        let mut payload = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_err)? {
            if payload.len() + chunk.len() > limit {
                return Err(FileServerErr::PayloadTooLarge(limit));
            }
            payload.extend_from_slice(&chunk);
        }
        return Ok(Upload { payload, original_name });
    }
    Err(FileServerErr::MissingFile)
}


#[post("")]
async fn upload_file(
    multipart: Multipart,
    shared_state: web::Data<AppState>,
) -> Result<HttpResponse, FileServerErr> {
    let upload = read_upload(multipart, shared_state.max_upload_bytes).await?;
    let size = upload.payload.len();

    let store = shared_state.store.clone();
    let id = web::block(move || store.save(&upload.payload, upload.original_name.as_deref())).await??;
    tracing::info!("Uploaded {} ({} bytes)", id, size);

    let resp = FileUploadResponse {
        id,
        download_url: format!("{}/{}", FILES_ROUTE, id),
        size,
    };
    Ok(HttpResponse::Created().json(resp))
}

#[get("/{id}")]
async fn download_file(
    from_path: web::Path<String>,
    shared_state: web::Data<AppState>,
) -> Result<NamedFile, FileServerErr> {
    let id = parse_id(&from_path)?;
    let store = shared_state.store.clone();
    let handle = web::block(move || store.load(&id)).await??;

    let display_name = if handle.file_name.is_empty() {
        id.to_string()
    } else {
        handle.file_name.clone()
    };
    let file = NamedFile::from_file(handle.file, &handle.path).map_err(BlobError::from)?;

    Ok(file
        .set_content_type(mime::APPLICATION_OCTET_STREAM)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(display_name)],
        })
        .use_etag(false)
        .use_last_modified(false))
}

#[delete("/{id}")]
async fn delete_file(
    from_path: web::Path<String>,
    shared_state: web::Data<AppState>,
) -> Result<HttpResponse, FileServerErr> {
    let id = parse_id(&from_path)?;
    let store = shared_state.store.clone();
    let outcome = web::block(move || store.delete(&id)).await??;

    if !outcome.is_complete() {
        tracing::warn!("Partially deleted {}: {} removed, {} failed", id, outcome.removed, outcome.failed);
    } else {
        tracing::debug!("Deleted {} ({} files)", id, outcome.removed);
    }
    Ok(HttpResponse::NoContent().finish())
}

#[head("/{id}")]
async fn head_file(
    from_path: web::Path<String>,
    shared_state: web::Data<AppState>,
) -> Result<HttpResponse, FileServerErr> {
    let id = parse_id(&from_path)?;
    let store = shared_state.store.clone();
    if web::block(move || store.exists(&id)).await? {
        Ok(HttpResponse::Ok().finish())
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}
