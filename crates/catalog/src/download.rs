//! Download resolver and the local save trigger.

use std::path::{Path, PathBuf};

use aula_protocol::{Category, Credential, DownloadSlot};
use aula_storage_client::{ApiError, HttpStorageClient, StorageApi};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::listing::Catalog;

/// Name used when a listing entry has no usable final path component.
const FALLBACK_FILE_NAME: &str = "download";

impl<A: StorageApi> Catalog<A> {
    /// Asks the API for a one-time retrieval URL for `file_name`.
    ///
    /// Concurrent calls for the same file are independent requests.
    pub async fn resolve_download(
        &self,
        category: &Category,
        file_name: &str,
        credential: &str,
    ) -> Result<DownloadSlot, CatalogError> {
        let credential = Credential::new(credential)?;

        let resp = self
            .api()
            .download_slot(&credential, category, file_name)
            .await
            .map_err(|e| {
                warn!(%category, file = file_name, error = %e, "download slot request failed");
                CatalogError::download(e)
            })?;

        let Some(url) = resp.url() else {
            warn!(%category, file = file_name, "download response has no url");
            return Err(CatalogError::download(ApiError::Malformed(
                "response has no download url".into(),
            )));
        };

        debug!(%category, file = file_name, "download slot resolved");
        Ok(DownloadSlot::new(url))
    }
}

/// Saves download slots into a local directory.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    client: HttpStorageClient,
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(client: HttpStorageClient, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetches `slot` into the save directory as `file_name` and returns
    /// the saved path.
    ///
    /// Bytes are streamed into a temporary file unique to this call and
    /// moved into place only once complete, so a failed save leaves any
    /// existing file untouched and concurrent saves of one name never
    /// mix their contents.
    pub async fn save(&self, slot: &DownloadSlot, file_name: &str) -> Result<PathBuf, SaveError> {
        let dest = self.dir.join(local_file_name(file_name));
        let bytes = save_slot(&self.client, slot, &dest).await?;
        info!(path = %dest.display(), bytes, "file saved");
        Ok(dest)
    }

    /// Starts [`save`](Self::save) in the background.
    ///
    /// Fire-and-forget: the returned handle only signals completion.
    /// Failures are logged and never reported to the caller. The URL is
    /// not checked for reachability beforehand.
    pub fn trigger_save(&self, slot: DownloadSlot, file_name: &str) -> JoinHandle<()> {
        let saver = self.clone();
        let file_name = file_name.to_string();

        tokio::spawn(async move {
            if let Err(e) = saver.save(&slot, &file_name).await {
                warn!(file = %file_name, error = %e, "save failed");
            }
        })
    }
}

/// Errors from saving a download slot to disk.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<reqwest::Error> for SaveError {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.into())
    }
}

impl From<tempfile::PathPersistError> for SaveError {
    fn from(err: tempfile::PathPersistError) -> Self {
        Self::Io(err.error)
    }
}

async fn save_slot(
    client: &HttpStorageClient,
    slot: &DownloadSlot,
    dest: &Path,
) -> Result<u64, SaveError> {
    let mut resp = client.fetch_slot(slot).await?;

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&dir).await?;

    // Dropping `partial` before `persist` removes the temporary file.
    let name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(FALLBACK_FILE_NAME);
    let prefix = format!(".{name}.");
    let (file, partial) = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(&dir)?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);
    let mut written = 0u64;

    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    partial.persist(dest)?;
    Ok(written)
}

/// Reduces a listing entry to a name safe to create inside the save
/// directory: only the final path component is kept.
pub fn local_file_name(file_name: &str) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}
