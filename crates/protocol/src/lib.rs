//! Domain and wire types shared by the Aula client crates.
//!
//! Nothing here performs I/O: the types describe what the external
//! file-storage API accepts and returns, plus the caller-side values
//! (categories, credentials, slots) that flow through every request.

pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use constants::{API_KEY_HEADER, CATEGORIES, DEFAULT_CATEGORY, Endpoint};
pub use messages::{ErrorBody, ListResponse, SlotResponse, UploadSlotRequest};
pub use types::{
    Category, Credential, DownloadSlot, FileDescriptor, MissingCredential, UploadSlot,
};
