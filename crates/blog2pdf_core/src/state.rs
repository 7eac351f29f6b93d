use std::path::PathBuf;

use crate::view_model::{AppViewModel, DownloadView};

pub type SubmissionId = u64;

pub const CHECKING_MESSAGE: &str = "Checking URL accessibility...";
pub const SUCCESS_MESSAGE: &str = "PDF generated successfully! Use the download action to save it.";
pub const NOT_ACCESSIBLE_FALLBACK: &str = "URL is not accessible";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Checking,
    Converting,
    Done,
    Error,
}

/// Coarse stages of the conversion request, reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    /// Request sent; the backend is fetching the article.
    Fetching,
    /// Response headers received; the backend is cleaning content.
    Processing,
    /// The PDF body is streaming in.
    Generating,
}

impl ConversionStage {
    pub fn message(self) -> &'static str {
        match self {
            ConversionStage::Fetching => "Fetching article content...",
            ConversionStage::Processing => "Processing and cleaning content...",
            ConversionStage::Generating => "Generating PDF...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityResult {
    pub accessible: bool,
    pub error: Option<String>,
}

/// Opaque reference to a downloaded payload held outside the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultHandle {
    pub blob_id: u64,
    pub filename: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online {
        version: String,
    },
    Offline {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url: String,
    submitted_url: String,
    phase: Phase,
    loading: bool,
    progress_message: Option<String>,
    error_message: Option<String>,
    success_message: Option<String>,
    result: Option<ResultHandle>,
    save_status: Option<SaveStatus>,
    backend: BackendStatus,
    last_submission: SubmissionId,
    active_submission: Option<SubmissionId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url: self.url.clone(),
            phase: self.phase,
            loading: self.loading,
            submit_enabled: !self.loading,
            progress_message: self.progress_message.clone(),
            error_message: self.error_message.clone(),
            success_message: self.success_message.clone(),
            download: self.result.as_ref().map(|handle| DownloadView {
                filename: handle.filename.clone(),
                byte_len: handle.byte_len,
            }),
            save_status: self.save_status.clone(),
            backend: self.backend.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&ResultHandle> {
        self.result.as_ref()
    }

    pub fn active_submission(&self) -> Option<SubmissionId> {
        self.active_submission
    }

    pub fn submitted_url(&self) -> &str {
        &self.submitted_url
    }

    /// Returns whether state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_active(&self, submission: SubmissionId) -> bool {
        self.active_submission == Some(submission)
    }

    pub(crate) fn set_url(&mut self, url: String) {
        if self.url != url {
            self.url = url;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_backend(&mut self, status: BackendStatus) {
        self.backend = status;
        self.mark_dirty();
    }

    /// Starts a new submission from the current input and clears the outcome
    /// of the previous one. Returns the new id and the superseded result.
    pub(crate) fn begin_submission(&mut self) -> (SubmissionId, Option<ResultHandle>) {
        self.last_submission += 1;
        let submission = self.last_submission;
        self.active_submission = Some(submission);
        self.submitted_url = self.url.clone();
        self.phase = Phase::Validating;
        self.error_message = None;
        self.success_message = None;
        self.progress_message = None;
        self.save_status = None;
        let superseded = self.result.take();
        self.mark_dirty();
        (submission, superseded)
    }

    pub(crate) fn begin_check(&mut self) {
        self.phase = Phase::Checking;
        self.loading = true;
        self.progress_message = Some(CHECKING_MESSAGE.to_string());
        self.mark_dirty();
    }

    pub(crate) fn begin_conversion(&mut self) {
        self.phase = Phase::Converting;
        self.progress_message = Some(ConversionStage::Fetching.message().to_string());
        self.mark_dirty();
    }

    pub(crate) fn set_progress(&mut self, stage: ConversionStage) {
        let message = stage.message();
        if self.progress_message.as_deref() != Some(message) {
            self.progress_message = Some(message.to_string());
            self.mark_dirty();
        }
    }

    /// Terminal success. Returns a result handle that was replaced, if any.
    pub(crate) fn complete(&mut self, handle: ResultHandle) -> Option<ResultHandle> {
        let replaced = self.result.replace(handle);
        self.phase = Phase::Done;
        self.error_message = None;
        self.success_message = Some(SUCCESS_MESSAGE.to_string());
        self.settle();
        replaced
    }

    /// Terminal failure. Returns a result handle that was dropped, if any.
    pub(crate) fn fail(&mut self, message: String) -> Option<ResultHandle> {
        let dropped = self.result.take();
        self.phase = Phase::Error;
        self.error_message = Some(message);
        self.success_message = None;
        self.settle();
        dropped
    }

    pub(crate) fn take_result(&mut self) -> Option<ResultHandle> {
        let taken = self.result.take();
        if taken.is_some() {
            self.save_status = None;
            self.mark_dirty();
        }
        taken
    }

    pub(crate) fn set_save_status(&mut self, status: SaveStatus) {
        self.save_status = Some(status);
        self.mark_dirty();
    }

    // Runs on every terminal transition.
    fn settle(&mut self) {
        self.loading = false;
        self.progress_message = None;
        self.active_submission = None;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
