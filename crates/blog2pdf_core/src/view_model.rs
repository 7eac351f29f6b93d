use crate::{BackendStatus, Phase, SaveStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadView {
    pub filename: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url: String,
    pub phase: Phase,
    pub loading: bool,
    pub submit_enabled: bool,
    pub progress_message: Option<String>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub download: Option<DownloadView>,
    pub save_status: Option<SaveStatus>,
    pub backend: BackendStatus,
    pub dirty: bool,
}
