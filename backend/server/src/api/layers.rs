use axum::body::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::info;

use super::ApiClient;
use crate::error::AppError;

/// One slice of a layer file on its way to the upstream `/upload_layer`.
#[derive(Debug)]
pub struct LayerChunk {
    pub file_name: String,
    pub workspace_id: String,
    pub layer_name: Option<String>,
    pub current_chunk: u64,
    pub total_chunks: u64,
    pub file_size: u64,
    pub bytes: Bytes,
}

impl LayerChunk {
    fn into_form(self) -> Form {
        let len = self.bytes.len() as u64;
        let part = Part::stream_with_length(self.bytes, len).file_name(self.file_name.clone());

        let mut form = Form::new()
            .part("file", part)
            .text("fileName", self.file_name)
            .text("workspace_id", self.workspace_id)
            .text("currentChunk", self.current_chunk.to_string())
            .text("totalChunks", self.total_chunks.to_string())
            .text("fileSize", self.file_size.to_string());

        if let Some(layer_name) = self.layer_name {
            form = form.text("layer_name", layer_name);
        }

        form
    }
}

impl ApiClient {
    pub async fn upload_layer_chunk(
        &self,
        token: &str,
        chunk: LayerChunk,
    ) -> Result<Value, AppError> {
        info!(
            file = %chunk.file_name,
            chunk = chunk.current_chunk,
            total = chunk.total_chunks,
            bytes = chunk.bytes.len(),
            "Forwarding layer chunk"
        );

        let request = self.post("/upload_layer", token).multipart(chunk.into_form());

        self.send(request, "Failed to upload layer").await
    }
}
