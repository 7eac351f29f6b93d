use crate::{ResultHandle, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ProbeBackend,
    CheckAccessibility {
        submission: SubmissionId,
        url: String,
    },
    Convert {
        submission: SubmissionId,
        url: String,
    },
    /// The payload behind this blob is no longer referenced by the view.
    ReleaseResult { blob_id: u64 },
    SaveResult { handle: ResultHandle },
}
