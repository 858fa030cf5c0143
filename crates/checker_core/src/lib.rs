//! Image checker core: pure submission state machine and view-model helpers.
mod effect;
mod msg;
mod result;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use result::{
    format_confidence, server_error_message, ClassificationResult, Verdict, GENERIC_SERVER_ERROR,
};
pub use state::{
    AppState, Generation, PreviewArtifact, SelectedImage, SubmissionOutcome, BUSY_LABEL,
    IDLE_LABEL, MISSING_IMAGE_MESSAGE, NETWORK_ERROR_MESSAGE, NO_IMAGE_PLACEHOLDER,
};
pub use update::update;
pub use view_model::{AppViewModel, PreviewView, ResultView, UiState, VerdictView};
