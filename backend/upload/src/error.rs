use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File is empty")]
    EmptyFile,

    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected {
        chunk: u64,
        status: u16,
        message: String,
    },

    #[error("Upload aborted before chunk {chunk}")]
    Aborted { chunk: u64 },
}

/// Error text from a rejected chunk.
///
/// The back end answers `{"success": false, "error": ...}`. Any other body,
/// such as a proxy's HTML error page, gives `fallback`.
pub fn rejection_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback.to_string())
}
