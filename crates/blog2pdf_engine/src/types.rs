use bytes::Bytes;
use serde::Deserialize;

pub type SubmissionId = u64;

/// Reported when the check request itself fails.
pub const CHECK_TRANSPORT_MESSAGE: &str =
    "Failed to check URL accessibility. Please make sure the backend server is running.";
/// Fallback when a rejected conversion carries no usable `detail`.
pub const CONVERT_REJECTED_MESSAGE: &str = "Failed to convert URL to PDF";
/// Reported when the conversion request itself fails.
pub const CONVERT_TRANSPORT_MESSAGE: &str =
    "Failed to convert URL to PDF. Please make sure the backend server is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Processing,
    Generating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityResult {
    pub accessible: bool,
    pub error: Option<String>,
}

impl AccessibilityResult {
    pub fn accessible() -> Self {
        Self {
            accessible: true,
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            accessible: false,
            error: Some(message.into()),
        }
    }
}

/// Response of the backend health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendInfo {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    pub bytes: Bytes,
    pub source_url: String,
    /// Name suggested by `Content-Disposition`, or the default.
    pub filename: String,
    pub content_type: Option<String>,
    pub download_token: Option<String>,
    pub expires_in: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    BackendProbed(Result<BackendInfo, ClientError>),
    AccessibilityChecked {
        submission: SubmissionId,
        result: AccessibilityResult,
    },
    Progress {
        submission: SubmissionId,
        stage: Stage,
    },
    ConversionCompleted {
        submission: SubmissionId,
        result: Result<ConversionOutput, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid backend url: {0}")]
    InvalidBaseUrl(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("backend rejected request with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::Network(_))
    }

    /// User-facing message for a failed conversion request.
    pub fn conversion_message(&self) -> String {
        match self {
            ClientError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Rejected { detail: None, .. } => CONVERT_REJECTED_MESSAGE.to_string(),
            ClientError::TooLarge { max_bytes, .. } => {
                format!("Generated PDF exceeds the {max_bytes} byte limit")
            }
            ClientError::Timeout(_) | ClientError::Network(_) | ClientError::InvalidBaseUrl(_) => {
                CONVERT_TRANSPORT_MESSAGE.to_string()
            }
            ClientError::InvalidResponse(_) => CONVERT_REJECTED_MESSAGE.to_string(),
        }
    }
}
