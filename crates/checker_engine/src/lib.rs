//! Image checker engine: preview decoding, endpoint submission and effect execution.
mod engine;
mod preview;
mod submit;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use preview::{decode_preview, load_preview, PreviewError, PreviewSettings};
pub use submit::{ReqwestSubmitter, SubmitSettings, Submitter, CHECK_IMAGE_PATH, HEALTH_PATH};
pub use types::{EngineEvent, FailureKind, SubmitError};
