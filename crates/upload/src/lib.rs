//! Uploader-side flow.
//!
//! An upload is a two-phase handshake with the storage API:
//!
//! 1. **Slot**: ask for a one-time write URL for the file (credentialed)
//! 2. **Transfer**: PUT the raw bytes to that URL (no credential)
//!
//! The transfer offers no byte-level progress, so [`Progress`] is driven by
//! a [`ProgressEstimator`]. The default [`TimedEstimator`] advances on wall
//! time against a nominal duration per phase and can be swapped for a real
//! source without touching the handshake.

mod content_type;
mod orchestrator;
mod progress;

pub use content_type::{DEFAULT_CONTENT_TYPE, detect_content_type};
pub use orchestrator::{UploadOrchestrator, UploadOutcome, UploadRequest};
pub use progress::{
    COMPLETE, MAX_ESTIMATE, PHASE_SLOT, PHASE_TRANSFER, PhaseSpan, PhaseTicker, Progress,
    ProgressEstimator, START, TimedEstimator,
};

use aula_protocol::MissingCredential;
use aula_storage_client::ApiError;

/// Errors produced by the upload flow.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    MissingCredential(#[from] MissingCredential),

    #[error("failed to request upload slot: {0}")]
    SlotRequestFailed(#[source] ApiError),

    #[error("upload failed: {0}")]
    TransferFailed(#[source] ApiError),
}
