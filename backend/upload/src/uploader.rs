//! # Chunked upload
//!
//! Sends a file to one endpoint as a sequence of multipart requests.
//!
//! ## Flow
//! 1. Split the file with [`ChunkPlan`].
//! 2. For each chunk in order: read its bytes, POST them with the descriptor,
//!    wait for the response.
//! 3. A chunk counts as accepted on a 2xx whose JSON body is not `success: false`.
//!    Progress is reported after each accepted chunk.
//! 4. The first failure stops the loop. Nothing is retried or cleaned up.
//!
//! The observer gets exactly one of `on_success` / `on_error` per call.
//!
//! ## Form fields
//! - `file`: chunk bytes, named after the file
//! - `fileName`, `workspace_id`, `layer_name` (optional)
//! - `currentChunk`, `totalChunks`, `fileSize`
use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use reqwest::{
    Client,
    header::COOKIE,
    multipart::{Form, Part},
};
use serde_json::Value;
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt},
};
use tracing::{debug, info, warn};

use crate::{
    error::{UploadError, rejection_message},
    plan::{CHUNK_SIZE, Chunk, ChunkDescriptor, ChunkPlan},
};

pub const SESSION_COOKIE: &str = "sid";

/// Callbacks fired while an upload runs.
pub trait UploadObserver {
    fn on_progress(&mut self, _percent: u8) {}

    fn on_success(&mut self, _response: &Value) {}

    fn on_error(&mut self, _message: &str) {}
}

impl UploadObserver for () {}

/// Stops an upload before its next chunk. The request in flight still completes.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub struct UploadTarget {
    pub workspace_id: String,
    pub layer_name: Option<String>,
}

impl UploadTarget {
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            layer_name: None,
        }
    }

    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = Some(layer_name.into());
        self
    }
}

pub struct ChunkUploader {
    client: Client,
    endpoint: String,
    session: Option<String>,
    chunk_size: u64,
}

impl ChunkUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            session: None,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Sent as the `sid` cookie on every chunk.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub async fn upload_file(
        &self,
        path: &Path,
        target: &UploadTarget,
        observer: &mut impl UploadObserver,
        abort: &AbortHandle,
    ) -> Result<Value, UploadError> {
        let opened = async {
            let file = File::open(path).await?;
            let file_size = file.metadata().await?.len();

            Ok::<_, UploadError>((file, file_size))
        }
        .await;

        match opened {
            Ok((file, file_size)) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string());

                self.upload_reader(file, &file_name, file_size, target, observer, abort)
                    .await
            }
            Err(e) => {
                observer.on_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Uploads `file_size` bytes read sequentially from `reader`.
    pub async fn upload_reader<R: AsyncRead + Unpin>(
        &self,
        reader: R,
        file_name: &str,
        file_size: u64,
        target: &UploadTarget,
        observer: &mut impl UploadObserver,
        abort: &AbortHandle,
    ) -> Result<Value, UploadError> {
        match self
            .send_all(reader, file_name, file_size, target, observer, abort)
            .await
        {
            Ok(response) => {
                info!(file = file_name, file_size, "Upload complete");
                observer.on_success(&response);
                Ok(response)
            }
            Err(e) => {
                warn!(file = file_name, "Upload failed: {e}");
                observer.on_error(&e.to_string());
                Err(e)
            }
        }
    }

    async fn send_all<R: AsyncRead + Unpin>(
        &self,
        mut reader: R,
        file_name: &str,
        file_size: u64,
        target: &UploadTarget,
        observer: &mut impl UploadObserver,
        abort: &AbortHandle,
    ) -> Result<Value, UploadError> {
        let plan = ChunkPlan::new(file_size, self.chunk_size)?;
        let mut last = Value::Null;

        for chunk in plan.chunks() {
            if abort.is_aborted() {
                return Err(UploadError::Aborted { chunk: chunk.index });
            }

            let mut bytes = vec![0; chunk.len() as usize];
            reader.read_exact(&mut bytes).await?;

            last = self
                .send_chunk(bytes, file_name, &chunk, plan.descriptor(&chunk), target)
                .await?;

            observer.on_progress(plan.progress_after(&chunk));
        }

        Ok(last)
    }

    async fn send_chunk(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        chunk: &Chunk,
        descriptor: ChunkDescriptor,
        target: &UploadTarget,
    ) -> Result<Value, UploadError> {
        debug!(
            chunk = descriptor.current_chunk,
            total = descriptor.total_chunks,
            start = chunk.start,
            end = chunk.end,
            "Sending chunk"
        );

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let mut form = Form::new()
            .part("file", part)
            .text("fileName", file_name.to_string())
            .text("workspace_id", target.workspace_id.clone())
            .text("currentChunk", descriptor.current_chunk.to_string())
            .text("totalChunks", descriptor.total_chunks.to_string())
            .text("fileSize", descriptor.file_size.to_string());

        if let Some(layer_name) = &target.layer_name {
            form = form.text("layer_name", layer_name.clone());
        }

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.session {
            request = request.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let rejected = |message: String| UploadError::Rejected {
            chunk: chunk.index,
            status: status.as_u16(),
            message,
        };

        if !status.is_success() {
            return Err(rejected(rejection_message(
                &body,
                &format!("Chunk {} failed with status {status}", chunk.index),
            )));
        }

        let json: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)
                .map_err(|_| rejected(format!("Invalid response for chunk {}", chunk.index)))?
        };

        if json.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(rejected(rejection_message(&body, "Upload failed")));
        }

        Ok(json)
    }
}
