//! Catalog error types.

use aula_protocol::MissingCredential;
use aula_storage_client::ApiError;

/// Errors produced by the listing and download flows.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    MissingCredential(#[from] MissingCredential),

    #[error("{context}: {source}")]
    RetrievalFailed {
        context: &'static str,
        source: ApiError,
    },
}

impl CatalogError {
    pub(crate) fn listing(source: ApiError) -> Self {
        Self::RetrievalFailed {
            context: "failed to list files",
            source,
        }
    }

    pub(crate) fn download(source: ApiError) -> Self {
        Self::RetrievalFailed {
            context: "failed to download file",
            source,
        }
    }
}
