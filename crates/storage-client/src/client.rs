//! Storage API client.
//!
//! Async HTTP client using `reqwest` with `X-API-Key` header authentication.

use aula_protocol::{
    API_KEY_HEADER, Category, Credential, DownloadSlot, Endpoint, ErrorBody, ListResponse,
    SlotResponse, UploadSlot, UploadSlotRequest,
};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiFuture, StorageApi};
use crate::error::ApiError;

/// Storage API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorageClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStorageClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// A trailing `/` is added when missing so endpoint paths append
    /// cleanly.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a GET of a download slot, returning the response once its
    /// status is known to be 2xx.
    pub async fn fetch_slot(&self, slot: &DownloadSlot) -> Result<Response, ApiError> {
        let resp = self.http.get(slot.url()).send().await?;
        check_status(resp).await
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Builds a request to `endpoint` carrying the credential header.
    fn authed(
        &self,
        method: reqwest::Method,
        endpoint: Endpoint,
        credential: &Credential,
    ) -> Result<RequestBuilder, ApiError> {
        let key = HeaderValue::from_str(credential.expose()).map_err(|_| {
            ApiError::Request("API key contains characters not allowed in a header".into())
        })?;
        Ok(self
            .http
            .request(method, self.endpoint_url(endpoint))
            .header(API_KEY_HEADER, key))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let resp = check_status(request.send().await?).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

impl StorageApi for HttpStorageClient {
    fn list<'a>(
        &'a self,
        credential: &'a Credential,
        category: &'a Category,
    ) -> ApiFuture<'a, ListResponse> {
        Box::pin(async move {
            debug!(%category, "requesting file listing");
            let request = self
                .authed(reqwest::Method::GET, Endpoint::List, credential)?
                .query(&[("category", category.as_str())]);
            self.send_json(request).await
        })
    }

    fn download_slot<'a>(
        &'a self,
        credential: &'a Credential,
        category: &'a Category,
        file_name: &'a str,
    ) -> ApiFuture<'a, SlotResponse> {
        Box::pin(async move {
            debug!(%category, file = file_name, "requesting download slot");
            let request = self
                .authed(reqwest::Method::GET, Endpoint::Download, credential)?
                .query(&[("category", category.as_str()), ("file", file_name)]);
            self.send_json(request).await
        })
    }

    fn upload_slot<'a>(
        &'a self,
        credential: &'a Credential,
        request: &'a UploadSlotRequest,
    ) -> ApiFuture<'a, SlotResponse> {
        Box::pin(async move {
            debug!(
                category = %request.category,
                file = %request.file_name,
                content_type = %request.content_type,
                "requesting upload slot"
            );
            let builder = self
                .authed(reqwest::Method::POST, Endpoint::UploadRequest, credential)?
                .json(request);
            self.send_json(builder).await
        })
    }

    fn put_to_slot<'a>(
        &'a self,
        slot: &'a UploadSlot,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            debug!(bytes = bytes.len(), content_type, "transferring to upload slot");
            let resp = self
                .http
                .put(slot.url())
                .header(CONTENT_TYPE, content_type)
                .body(bytes)
                .send()
                .await?;
            check_status(resp).await?;
            Ok(())
        })
    }
}

/// Turns a non-2xx response into [`ApiError::Status`].
async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.bytes().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: ErrorBody::parse(&body).message().map(str::to_owned),
        reason: status.canonical_reason().map(str::to_owned),
    })
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
