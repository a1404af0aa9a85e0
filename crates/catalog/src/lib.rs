//! Student-side flows: list the files of a category, narrow the listing
//! locally, and resolve a file to a download slot that is then saved to
//! disk.
//!
//! Every flow checks the credential before touching the network; a blank
//! key fails with [`CatalogError::MissingCredential`] and no request is
//! made.

pub mod download;
pub mod error;
pub mod listing;

pub use download::{DiskSaver, SaveError, local_file_name};
pub use error::CatalogError;
pub use listing::{Catalog, Listing, filter_files};
