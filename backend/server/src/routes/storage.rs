//! # Upload proxies
//!
//! Three ways a file gets in:
//! - `POST /api/remote-file-s3-upload`: multipart `file` (+ optional `folder`) straight into S3
//! - `POST /api/remote-file-s3-upload/stream`: raw body + `?fileName=` straight into S3
//! - `POST /api/upload-layer`: one chunk of a layer file, forwarded to the GridWalk API
//!
//! All three need a session.
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Query, State},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    api::layers::LayerChunk,
    error::AppError,
    session::Session,
    state::AppState,
    storage::object_key,
    utils::required,
};

/// One 15 MiB chunk plus multipart overhead.
pub const CHUNK_BODY_LIMIT: usize = 20 * 1024 * 1024;
pub const S3_BODY_LIMIT: usize = 100 * 1024 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(rename = "fileName", alias = "file_name")]
    file_name: Option<String>,
    folder: Option<String>,
}

struct UploadedFile {
    name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

async fn store(
    state: &AppState,
    key: String,
    content_type: &str,
    bytes: Bytes,
) -> Result<Json<Value>, AppError> {
    if bytes.is_empty() {
        return Err(AppError::malformed("File is empty"));
    }

    state.objects.put_object(&key, content_type, bytes).await?;

    Ok(Json(json!({
        "success": true,
        "key": key,
        "bucket": state.objects.bucket(),
    })))
}

pub async fn s3_upload_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<Value>, AppError> {
    let mut file = None;
    let mut folder = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);

                file = Some(UploadedFile {
                    name: file_name,
                    content_type,
                    bytes: field.bytes().await?,
                });
            }
            "folder" => folder = Some(field.text().await?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::malformed("No file provided"))?;
    let key = object_key(folder.as_deref(), file.name.as_deref().unwrap_or_default())?;
    let content_type = file.content_type.as_deref().unwrap_or(OCTET_STREAM);

    store(&state, key, content_type, file.bytes).await
}

pub async fn s3_stream_upload_handler(
    State(state): State<Arc<AppState>>,
    _session: Session,
    WithRejection(Query(query), _): WithRejection<Query<StreamQuery>, AppError>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let file_name = required("fileName", query.file_name.as_deref())?;
    let key = object_key(query.folder.as_deref(), file_name)?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(OCTET_STREAM);

    store(&state, key, content_type, body).await
}

fn parse_count(field: &str, value: Option<&str>) -> Result<u64, AppError> {
    required(field, value)?
        .parse()
        .map_err(|_| AppError::malformed(format!("{field} must be a non-negative integer")))
}

/// Collects the chunk uploader's form fields into a [`LayerChunk`].
async fn read_chunk(mut multipart: Multipart) -> Result<LayerChunk, AppError> {
    let mut bytes = None;
    let mut part_name = None;
    let mut file_name = None;
    let mut workspace_id = None;
    let mut layer_name = None;
    let mut current_chunk = None;
    let mut total_chunks = None;
    let mut file_size = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                part_name = field.file_name().map(str::to_string);
                bytes = Some(field.bytes().await?);
            }
            "fileName" => file_name = Some(field.text().await?),
            "workspace_id" | "workspaceId" => workspace_id = Some(field.text().await?),
            "layer_name" | "layerName" => layer_name = Some(field.text().await?),
            "currentChunk" => current_chunk = Some(field.text().await?),
            "totalChunks" => total_chunks = Some(field.text().await?),
            "fileSize" => file_size = Some(field.text().await?),
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| AppError::malformed("No file provided"))?;
    let file_name = required("fileName", file_name.as_deref().or(part_name.as_deref()))?;
    let workspace_id = required("workspace_id", workspace_id.as_deref())?;
    let current_chunk = parse_count("currentChunk", current_chunk.as_deref())?;
    let total_chunks = parse_count("totalChunks", total_chunks.as_deref())?;
    let file_size = parse_count("fileSize", file_size.as_deref())?;

    if total_chunks == 0 || current_chunk >= total_chunks {
        return Err(AppError::malformed(format!(
            "currentChunk {current_chunk} is out of range for {total_chunks} chunks"
        )));
    }

    Ok(LayerChunk {
        file_name: file_name.to_string(),
        workspace_id: workspace_id.to_string(),
        layer_name: layer_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        current_chunk,
        total_chunks,
        file_size,
        bytes,
    })
}

pub async fn upload_layer_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<Value>, AppError> {
    let chunk = read_chunk(multipart).await?;

    let response = state.api.upload_layer_chunk(session.token(), chunk).await?;

    Ok(Json(response))
}
