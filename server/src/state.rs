use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use audioguard_detect::DetectionService;

use crate::SetupError;

/// Fixed network timeout for remote audio fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state for both router variants.
///
/// The detection service is read-only after its one-time load, so a
/// plain `Arc` is enough for concurrent requests.
#[derive(Clone)]
pub struct AppState {
    service: Arc<dyn DetectionService>,
    upload_dir: PathBuf,
    fetch: reqwest::Client,
}

impl AppState {
    /// Creates the state and ensures the upload directory exists.
    pub fn new(service: Arc<dyn DetectionService>, upload_dir: &Path) -> Result<Self, SetupError> {
        std::fs::create_dir_all(upload_dir)?;
        let fetch = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            service,
            upload_dir: upload_dir.to_path_buf(),
            fetch,
        })
    }

    pub fn service(&self) -> &Arc<dyn DetectionService> {
        &self.service
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn fetch(&self) -> &reqwest::Client {
        &self.fetch
    }
}
