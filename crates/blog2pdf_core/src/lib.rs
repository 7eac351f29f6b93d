//! blog2pdf core: URL validation and the pure submission state machine.
mod effect;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AccessibilityResult, AppState, BackendStatus, ConversionStage, Phase, ResultHandle,
    SaveStatus, SubmissionId, CHECKING_MESSAGE, NOT_ACCESSIBLE_FALLBACK, SUCCESS_MESSAGE,
};
pub use update::update;
pub use validate::{
    validate_url, ValidationResult, EMPTY_URL_MESSAGE, INVALID_FORMAT_MESSAGE,
    MISSING_SCHEME_MESSAGE,
};
pub use view_model::{AppViewModel, DownloadView};
