//! Two-phase upload orchestrator.

use aula_protocol::{Category, Credential, UploadSlot, UploadSlotRequest};
use aula_storage_client::{ApiError, StorageApi};
use tracing::{debug, error, info, warn};

use crate::UploadError;
use crate::progress::{
    PHASE_SLOT, PHASE_TRANSFER, Progress, ProgressEstimator, START, TimedEstimator,
};

/// A file to upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub category: Category,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Final state of an upload as a front-end renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub success: bool,
    pub progress: u8,
    /// Set exactly when `success` is false.
    pub error: Option<String>,
}

/// Runs the slot-then-transfer handshake against a [`StorageApi`].
pub struct UploadOrchestrator<A, E = TimedEstimator> {
    api: A,
    estimator: E,
}

impl<A: StorageApi> UploadOrchestrator<A> {
    /// Creates an orchestrator using the time-based estimator.
    pub fn new(api: A) -> Self {
        Self::with_estimator(api, TimedEstimator::default())
    }
}

impl<A: StorageApi, E: ProgressEstimator> UploadOrchestrator<A, E> {
    pub fn with_estimator(api: A, estimator: E) -> Self {
        Self { api, estimator }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Phase 1: obtains a write slot for the file.
    ///
    /// The response must carry a non-empty string URL; anything else is
    /// [`UploadError::SlotRequestFailed`] and no slot is produced.
    pub async fn request_upload_slot(
        &self,
        credential: &Credential,
        category: &Category,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadSlot, UploadError> {
        let request = UploadSlotRequest {
            category: category.clone(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        };

        let resp = self
            .api
            .upload_slot(credential, &request)
            .await
            .map_err(UploadError::SlotRequestFailed)?;

        let Some(url) = resp.url() else {
            return Err(UploadError::SlotRequestFailed(ApiError::Malformed(
                "no valid upload url in response".into(),
            )));
        };

        debug!(%category, file = file_name, "upload slot granted");
        Ok(UploadSlot::new(url))
    }

    /// Phase 2: sends the bytes to the slot, consuming it.
    ///
    /// No credential is sent; the slot URL carries its own authorization.
    pub async fn transfer_bytes(
        &self,
        slot: UploadSlot,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), UploadError> {
        self.api
            .put_to_slot(&slot, bytes, content_type)
            .await
            .map_err(UploadError::TransferFailed)
    }

    /// Runs both phases, publishing progress along the way.
    ///
    /// Progress starts at [`START`], is held at the slot phase boundary once
    /// a slot is granted, and reaches 100 only after the transfer succeeds.
    /// On failure it stays where it was. The estimate is stopped at the end
    /// of each phase whatever its outcome.
    pub async fn upload(
        &self,
        credential: &str,
        request: UploadRequest,
        progress: &Progress,
    ) -> Result<(), UploadError> {
        let credential = Credential::new(credential)?;
        let UploadRequest {
            category,
            file_name,
            content_type,
            bytes,
        } = request;

        progress.advance(START);

        let ticker = self.estimator.start(progress, PHASE_SLOT);
        let slot = self
            .request_upload_slot(&credential, &category, &file_name, &content_type)
            .await;
        ticker.stop().await;
        let slot = slot?;
        progress.advance(PHASE_SLOT.to);

        debug!(
            %category,
            file = %file_name,
            bytes = bytes.len(),
            %content_type,
            "transferring file"
        );
        let ticker = self.estimator.start(progress, PHASE_TRANSFER);
        let sent = self.transfer_bytes(slot, bytes, &content_type).await;
        ticker.stop().await;
        sent?;

        progress.complete();
        Ok(())
    }

    /// Like [`upload`](Self::upload) but folds the result into the state a
    /// front-end shows: success flag, last progress value, and one message
    /// on failure.
    pub async fn run(
        &self,
        credential: &str,
        request: UploadRequest,
        progress: &Progress,
    ) -> UploadOutcome {
        let category = request.category.clone();
        let file_name = request.file_name.clone();

        match self.upload(credential, request, progress).await {
            Ok(()) => {
                info!(%category, file = %file_name, "upload completed");
                UploadOutcome {
                    success: true,
                    progress: progress.get(),
                    error: None,
                }
            }
            Err(e) => {
                let message = e.to_string();
                match &e {
                    UploadError::MissingCredential(_) => warn!(error = %message, "upload refused"),
                    _ => error!(%category, file = %file_name, error = %message, "upload failed"),
                }
                UploadOutcome {
                    success: false,
                    progress: progress.get(),
                    error: Some(message),
                }
            }
        }
    }
}
