/// Header carrying the caller credential on every authenticated request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Subjects offered by the front-ends.
///
/// This list is a convenience for pickers; requests never validate a
/// category against it.
pub const CATEGORIES: &[&str] = &[
    "matematicas",
    "fisica",
    "quimica",
    "historia",
    "lengua",
    "biologia",
];

/// Category selected when none is configured.
pub const DEFAULT_CATEGORY: &str = "matematicas";

/// Endpoints of the external file-storage API, relative to its base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET list?category=..`
    List,
    /// `GET download?category=..&file=..`
    Download,
    /// `POST upload-request`
    UploadRequest,
}

impl Endpoint {
    /// Path segment appended to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Download => "download",
            Self::UploadRequest => "upload-request",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
