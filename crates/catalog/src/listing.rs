//! Listing client and the local listing filter.

use aula_protocol::{Category, Credential, FileDescriptor};
use aula_storage_client::StorageApi;
use tracing::{info, warn};

use crate::error::CatalogError;

/// Entry point for the student-side flows.
///
/// Generic over the transport so tests can count the calls that reach it.
pub struct Catalog<A> {
    api: A,
}

impl<A: StorageApi> Catalog<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the names of the files stored under `category`.
    ///
    /// Names come back in the order the server sent them. An empty listing
    /// is a valid result, not an error. Nothing is cached: each call is a
    /// fresh request.
    pub async fn list_files(
        &self,
        category: &Category,
        credential: &str,
    ) -> Result<Vec<FileDescriptor>, CatalogError> {
        let credential = Credential::new(credential)?;

        match self.api.list(&credential, category).await {
            Ok(resp) => {
                let files = resp.into_files();
                info!(%category, files = files.len(), "listing fetched");
                Ok(files)
            }
            Err(e) => {
                warn!(%category, error = %e, "listing failed");
                Err(CatalogError::listing(e))
            }
        }
    }
}

/// Keeps files whose name contains `term`, ignoring case.
///
/// Pure and local: it never triggers a fetch. An empty term keeps
/// everything.
pub fn filter_files<'a>(files: &'a [FileDescriptor], term: &str) -> Vec<&'a FileDescriptor> {
    let needle = term.to_lowercase();
    files
        .iter()
        .filter(|f| f.name().to_lowercase().contains(&needle))
        .collect()
}

/// The last successful listing plus the active search term.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    files: Vec<FileDescriptor>,
    term: String,
}

impl Listing {
    /// Replaces the whole listing with a fresh result.
    pub fn replace(&mut self, files: Vec<FileDescriptor>) {
        self.files = files;
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Files matching the current term.
    pub fn visible(&self) -> Vec<&FileDescriptor> {
        filter_files(&self.files, &self.term)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use aula_protocol::{ListResponse, SlotResponse, UploadSlot, UploadSlotRequest};
    use aula_storage_client::{ApiError, ApiFuture};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory transport returning canned responses and counting calls.
    #[derive(Default)]
    pub(crate) struct MockApi {
        pub list: Mutex<Option<Result<ListResponse, ApiError>>>,
        pub download: Mutex<Option<Result<SlotResponse, ApiError>>>,
        pub calls: AtomicUsize,
        pub last_file: Mutex<Option<String>>,
    }

    impl MockApi {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StorageApi for MockApi {
        fn list<'a>(
            &'a self,
            _credential: &'a Credential,
            _category: &'a Category,
        ) -> ApiFuture<'a, ListResponse> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.list
                    .lock()
                    .unwrap()
                    .take()
                    .unwrap_or_else(|| Ok(ListResponse::default()))
            })
        }

        fn download_slot<'a>(
            &'a self,
            _credential: &'a Credential,
            _category: &'a Category,
            file_name: &'a str,
        ) -> ApiFuture<'a, SlotResponse> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                *self.last_file.lock().unwrap() = Some(file_name.to_string());
                self.download
                    .lock()
                    .unwrap()
                    .take()
                    .unwrap_or_else(|| Ok(SlotResponse::default()))
            })
        }

        fn upload_slot<'a>(
            &'a self,
            _credential: &'a Credential,
            _request: &'a UploadSlotRequest,
        ) -> ApiFuture<'a, SlotResponse> {
            Box::pin(async move {
                Err::<SlotResponse, _>(ApiError::Request("catalog never uploads".into()))
            })
        }

        fn put_to_slot<'a>(
            &'a self,
            _slot: &'a UploadSlot,
            _bytes: Vec<u8>,
            _content_type: &'a str,
        ) -> ApiFuture<'a, ()> {
            Box::pin(async move { Err::<(), _>(ApiError::Request("catalog never uploads".into())) })
        }
    }

    fn names(files: &[&FileDescriptor]) -> Vec<String> {
        files.iter().map(|f| f.name().to_string()).collect()
    }

    fn sample() -> Vec<FileDescriptor> {
        vec!["report_final.pdf".into(), "notes.txt".into()]
    }

    #[tokio::test]
    async fn blank_credential_makes_no_call() {
        let catalog = Catalog::new(MockApi::default());
        for key in ["", " ", "\t"] {
            let err = catalog
                .list_files(&Category::from("fisica"), key)
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::MissingCredential(_)));
        }
        assert_eq!(catalog.api().calls(), 0);
    }

    #[tokio::test]
    async fn returns_files_in_received_order() {
        let api = MockApi::default();
        *api.list.lock().unwrap() = Some(Ok(ListResponse {
            files: Some(vec!["b.pdf".into(), "a.pdf".into()]),
        }));
        let catalog = Catalog::new(api);

        let files = catalog
            .list_files(&Category::from("historia"), "alumno-5678")
            .await
            .unwrap();
        assert_eq!(files, vec![FileDescriptor::from("b.pdf"), "a.pdf".into()]);
        assert_eq!(catalog.api().calls(), 1);
    }

    #[tokio::test]
    async fn empty_listing_is_not_an_error() {
        let api = MockApi::default();
        *api.list.lock().unwrap() = Some(Ok(ListResponse {
            files: Some(Vec::new()),
        }));
        let catalog = Catalog::new(api);

        let files = catalog
            .list_files(&Category::from("quimica"), "alumno-5678")
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let api = MockApi::default();
        *api.list.lock().unwrap() = Some(Err(ApiError::Status {
            status: 403,
            message: Some("quota exceeded".into()),
            reason: Some("Forbidden".into()),
        }));
        let catalog = Catalog::new(api);

        let err = catalog
            .list_files(&Category::from("fisica"), "alumno-5678")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::RetrievalFailed { .. }));
        assert!(err.to_string().contains("quota exceeded"), "{err}");
    }

    #[tokio::test]
    async fn transport_failure_has_message() {
        let api = MockApi::default();
        *api.list.lock().unwrap() = Some(Err(ApiError::NoResponse {
            detail: "connection refused".into(),
        }));
        let catalog = Catalog::new(api);

        let err = catalog
            .list_files(&Category::from("fisica"), "alumno-5678")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to list files: no response from server, check your connection"
        );
    }

    #[test]
    fn filter_matches_substring() {
        let files = sample();
        assert_eq!(names(&filter_files(&files, "report")), vec!["report_final.pdf"]);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let files = sample();
        assert_eq!(names(&filter_files(&files, "REPORT")), vec!["report_final.pdf"]);
        assert_eq!(names(&filter_files(&files, "Notes")), vec!["notes.txt"]);
    }

    #[test]
    fn filter_empty_term_keeps_all() {
        let files = sample();
        assert_eq!(filter_files(&files, "").len(), 2);
        assert!(filter_files(&files, "zzz").is_empty());
    }

    #[test]
    fn listing_replace_and_visible() {
        let mut listing = Listing::default();
        listing.replace(sample());
        listing.set_term("report");
        assert_eq!(names(&listing.visible()), vec!["report_final.pdf"]);

        listing.replace(vec!["report_draft.pdf".into()]);
        assert_eq!(listing.files().len(), 1);
        assert_eq!(names(&listing.visible()), vec!["report_draft.pdf"]);
        assert_eq!(listing.term(), "report");
    }
}
