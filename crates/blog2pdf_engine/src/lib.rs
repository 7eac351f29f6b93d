//! blog2pdf engine: backend client and effect execution.
mod blob;
mod client;
mod engine;
mod filename;
mod layout;
mod persist;
mod settings;
mod types;

pub use blob::{BlobError, BlobId, BlobStore, StoredBlob};
pub use client::{BackendClient, ChannelProgressSink, ProgressSink, ReqwestBackend};
pub use engine::{EngineError, EngineHandle};
pub use filename::{deterministic_filename, filename_from_disposition, DEFAULT_PDF_FILENAME};
pub use layout::{LayoutTransform, PreserveLayout};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use settings::{BackendSettings, DEFAULT_BACKEND_URL};
pub use types::{
    AccessibilityResult, BackendInfo, ClientError, ConversionOutput, EngineEvent, Stage,
    SubmissionId, CHECK_TRANSPORT_MESSAGE, CONVERT_REJECTED_MESSAGE, CONVERT_TRANSPORT_MESSAGE,
};
