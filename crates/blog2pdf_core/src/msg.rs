use std::path::PathBuf;

use crate::{AccessibilityResult, BackendStatus, ConversionStage, ResultHandle, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view is mounted; probe the backend once.
    Started,
    /// User edited the URL input.
    InputChanged(String),
    /// User submitted the current URL input for conversion.
    SubmitClicked,
    /// Result of the backend health probe.
    BackendProbed(BackendStatus),
    /// Engine finished the accessibility check for a submission.
    AccessibilityChecked {
        submission: SubmissionId,
        result: AccessibilityResult,
    },
    /// Engine progress for the conversion request of a submission.
    ConversionProgress {
        submission: SubmissionId,
        stage: ConversionStage,
    },
    /// Engine completion for the conversion request of a submission.
    /// The error string is the user-facing message.
    ConversionFinished {
        submission: SubmissionId,
        result: Result<ResultHandle, String>,
    },
    /// User asked to download the current result.
    DownloadClicked,
    /// A result was written to disk.
    ResultSaved { blob_id: u64, path: PathBuf },
    /// Writing a result to disk failed.
    SaveFailed { blob_id: u64, message: String },
    /// The view is being torn down.
    ViewClosed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
