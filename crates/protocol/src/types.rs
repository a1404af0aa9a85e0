use std::fmt;

use serde::{Deserialize, Serialize};

/// Subject tag partitioning the remote file namespace.
///
/// Any string is accepted; [`crate::CATEGORIES`] is only what the
/// front-ends offer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CATEGORY)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returned when a blank credential is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("API key is required")]
pub struct MissingCredential;

/// Opaque access token sent as [`crate::API_KEY_HEADER`].
///
/// A `Credential` is never blank: construction rejects empty and
/// whitespace-only input, so holding one means the precondition for a
/// request has already been checked.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validates `raw` and wraps it.
    ///
    /// The value is kept verbatim (no trimming); only its blankness is
    /// checked.
    pub fn new(raw: impl Into<String>) -> Result<Self, MissingCredential> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(MissingCredential);
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Name of a stored object within a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileDescriptor(String);

impl FileDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileDescriptor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-time, time-limited write target issued by the storage API.
///
/// The URL itself carries the authorization, so transfers to a slot send
/// no credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot(String);

impl UploadSlot {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

/// One-time, time-limited read target issued by the storage API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSlot(String);

impl DownloadSlot {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}
