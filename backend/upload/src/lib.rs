//! # GridWalk Upload
//!
//! Client side of large layer uploads.
//!
//! Files go to the back end's `/api/upload-layer` route in 15 MiB slices, one
//! request at a time. See [`uploader`] for the request flow and [`plan`] for
//! how a file is split.
//!
//! ```no_run
//! # async fn run() -> Result<(), gridwalk_upload::UploadError> {
//! use gridwalk_upload::{AbortHandle, ChunkUploader, UploadTarget};
//!
//! let uploader = ChunkUploader::new("http://localhost:3001/api/upload-layer").with_session("token");
//! let target = UploadTarget::new("workspace-id").with_layer_name("parcels");
//!
//! uploader
//!     .upload_file("parcels.geojson".as_ref(), &target, &mut (), &AbortHandle::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod plan;
pub mod uploader;

pub use error::UploadError;
pub use plan::{CHUNK_SIZE, Chunk, ChunkDescriptor, ChunkPlan};
pub use uploader::{AbortHandle, ChunkUploader, UploadObserver, UploadTarget};
