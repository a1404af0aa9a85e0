//! Transport seam between the flows and the storage API.

use std::future::Future;
use std::pin::Pin;

use aula_protocol::{
    Category, Credential, ListResponse, SlotResponse, UploadSlot, UploadSlotRequest,
};

use crate::error::ApiError;

/// Boxed future returned by [`StorageApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Wire-level access to the storage API.
///
/// Implementations return decoded bodies as-is; judging whether a slot
/// URL is usable is left to the caller. Authenticated calls take a
/// [`Credential`], which cannot be blank. [`StorageApi::put_to_slot`]
/// takes none because the slot URL carries its own authorization.
pub trait StorageApi: Send + Sync {
    /// `GET list?category=..`
    fn list<'a>(
        &'a self,
        credential: &'a Credential,
        category: &'a Category,
    ) -> ApiFuture<'a, ListResponse>;

    /// `GET download?category=..&file=..`
    fn download_slot<'a>(
        &'a self,
        credential: &'a Credential,
        category: &'a Category,
        file_name: &'a str,
    ) -> ApiFuture<'a, SlotResponse>;

    /// `POST upload-request`
    fn upload_slot<'a>(
        &'a self,
        credential: &'a Credential,
        request: &'a UploadSlotRequest,
    ) -> ApiFuture<'a, SlotResponse>;

    /// `PUT <slot>` with the raw file bytes.
    fn put_to_slot<'a>(
        &'a self,
        slot: &'a UploadSlot,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> ApiFuture<'a, ()>;
}
