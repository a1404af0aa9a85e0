//! JSON bodies exchanged with the storage API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Category, FileDescriptor};

/// Response of the listing endpoint.
///
/// `files` may be missing or `null`; both read as an empty listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default, alias = "archivos")]
    pub files: Option<Vec<FileDescriptor>>,
}

impl ListResponse {
    pub fn into_files(self) -> Vec<FileDescriptor> {
        self.files.unwrap_or_default()
    }
}

/// Response of the download and upload-request endpoints.
///
/// `url` is kept as raw JSON so a non-string value can be told apart from
/// a missing one instead of failing deserialization outright.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlotResponse {
    #[serde(default)]
    pub url: Option<Value>,
}

impl SlotResponse {
    /// Returns the slot URL if it is a non-empty string.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_ref()
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// Phase-one body asking for an upload slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlotRequest {
    pub category: Category,
    pub file_name: String,
    pub content_type: String,
}

/// Structured error body some endpoints return with a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<Value>,
}

impl ErrorBody {
    /// Parses an error body, tolerating anything that is not JSON.
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The server-provided message, if it is a non-blank string.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_with_files() {
        let resp: ListResponse =
            serde_json::from_str(r#"{"files":["report_final.pdf","notes.txt"]}"#).unwrap();
        let files = resp.into_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name(), "report_final.pdf");
    }

    #[test]
    fn list_response_empty_missing_and_null() {
        for json in [r#"{"files":[]}"#, r#"{}"#, r#"{"files":null}"#] {
            let resp: ListResponse = serde_json::from_str(json).unwrap();
            assert!(resp.into_files().is_empty(), "{json}");
        }
    }

    #[test]
    fn list_response_accepts_archivos_alias() {
        let resp: ListResponse = serde_json::from_str(r#"{"archivos":["tema1.pdf"]}"#).unwrap();
        assert_eq!(resp.into_files(), vec![FileDescriptor::from("tema1.pdf")]);
    }

    #[test]
    fn slot_response_requires_non_empty_string() {
        let ok: SlotResponse = serde_json::from_str(r#"{"url":"https://store/slot1"}"#).unwrap();
        assert_eq!(ok.url(), Some("https://store/slot1"));

        for json in [r#"{}"#, r#"{"url":null}"#, r#"{"url":42}"#, r#"{"url":""}"#] {
            let resp: SlotResponse = serde_json::from_str(json).unwrap();
            assert_eq!(resp.url(), None, "{json}");
        }
    }

    #[test]
    fn upload_slot_request_is_camel_case() {
        let req = UploadSlotRequest {
            category: Category::from("fisica"),
            file_name: "lab.pdf".into(),
            content_type: "application/pdf".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["category"], "fisica");
        assert_eq!(json["fileName"], "lab.pdf");
        assert_eq!(json["contentType"], "application/pdf");
    }

    #[test]
    fn error_body_message() {
        assert_eq!(
            ErrorBody::parse(br#"{"message":"quota exceeded"}"#).message(),
            Some("quota exceeded")
        );
        assert_eq!(ErrorBody::parse(b"").message(), None);
        assert_eq!(ErrorBody::parse(b"<html>oops</html>").message(), None);
        assert_eq!(ErrorBody::parse(br#"{"message":7}"#).message(), None);
        assert_eq!(ErrorBody::parse(br#"{"message":"  "}"#).message(), None);
    }
}
