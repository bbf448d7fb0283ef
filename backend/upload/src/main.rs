use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gridwalk_upload::{AbortHandle, CHUNK_SIZE, ChunkUploader, UploadObserver, UploadTarget};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_ENDPOINT: &str = "http://localhost:3001/api/upload-layer";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    file: PathBuf,

    workspace_id: String,

    #[arg(long)]
    layer_name: Option<String>,

    #[arg(long, env = "GRIDWALK_UPLOAD_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Session token, sent as the `sid` cookie.
    #[arg(long, env = "GRIDWALK_SID")]
    sid: Option<String>,

    #[arg(long, default_value_t = CHUNK_SIZE)]
    chunk_size: u64,
}

struct ProgressReporter {
    pb: ProgressBar,
}

impl UploadObserver for ProgressReporter {
    fn on_progress(&mut self, percent: u8) {
        self.pb.set_position(percent as u64);
    }

    fn on_success(&mut self, _response: &Value) {
        self.pb.finish_with_message("Done");
    }

    fn on_error(&mut self, message: &str) {
        self.pb.abandon_with_message(message.to_string());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}",
        )?
        .progress_chars("=> "),
    );
    pb.set_message(format!("Uploading {}", args.file.display()));

    let mut uploader = ChunkUploader::new(&args.endpoint).with_chunk_size(args.chunk_size);
    if let Some(sid) = args.sid {
        uploader = uploader.with_session(sid);
    }

    let mut target = UploadTarget::new(args.workspace_id);
    if let Some(layer_name) = args.layer_name {
        target = target.with_layer_name(layer_name);
    }

    let mut reporter = ProgressReporter { pb };
    let response = uploader
        .upload_file(&args.file, &target, &mut reporter, &AbortHandle::default())
        .await
        .with_context(|| format!("Failed to upload {}", args.file.display()))?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
