//! Client for the external file-storage API.
//!
//! [`StorageApi`] is the seam the flows are written against; it speaks the
//! wire format and nothing more. [`HttpStorageClient`] implements it on
//! top of `reqwest`, sending the credential as an `X-API-Key` header on
//! every authenticated call and nothing on slot transfers.

pub mod api;
pub mod client;
pub mod error;

pub use api::{ApiFuture, StorageApi};
pub use client::HttpStorageClient;
pub use error::{ApiError, DEFAULT_MESSAGE, NO_RESPONSE_MESSAGE};
