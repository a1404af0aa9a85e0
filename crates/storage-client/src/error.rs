//! Failure taxonomy of a single API call.
//!
//! Every variant renders to exactly one non-empty, human-readable message.
//! The priority is: structured server message, then the generic transport
//! message, then [`DEFAULT_MESSAGE`].

/// Rendered when nothing more specific is known.
pub const DEFAULT_MESSAGE: &str = "unknown error";

/// Rendered when a request went out but no response came back.
pub const NO_RESPONSE_MESSAGE: &str = "no response from server, check your connection";

/// Errors from a storage API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("error {status}: {}", status_detail(.message, .reason))]
    Status {
        status: u16,
        /// `message` field of the JSON error body, if any.
        message: Option<String>,
        /// Canonical reason phrase of the status code.
        reason: Option<String>,
    },

    /// The request was sent but no response was received.
    #[error("no response from server, check your connection")]
    NoResponse { detail: String },

    /// The request could not be built or sent.
    #[error("{}", non_blank(.0))]
    Request(String),

    /// A 2xx response whose body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn status_detail<'a>(message: &'a Option<String>, reason: &'a Option<String>) -> &'a str {
    message
        .as_deref()
        .or(reason.as_deref())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MESSAGE)
}

fn non_blank(message: &str) -> &str {
    if message.trim().is_empty() {
        DEFAULT_MESSAGE
    } else {
        message
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_redirect() {
            Self::Request(err.to_string())
        } else if err.is_decode() || err.is_body() {
            // A response arrived but its body could not be read.
            Self::Malformed(err.to_string())
        } else {
            Self::NoResponse {
                detail: err.to_string(),
            }
        }
    }
}
