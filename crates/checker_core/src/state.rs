use std::path::{Path, PathBuf};

use crate::result::{format_confidence, ClassificationResult, Verdict};
use crate::view_model::{AppViewModel, PreviewView, ResultView, UiState, VerdictView};

pub const IDLE_LABEL: &str = "Check Image";
pub const BUSY_LABEL: &str = "Checking...";
pub const NO_IMAGE_PLACEHOLDER: &str = "No image selected.";
pub const MISSING_IMAGE_MESSAGE: &str = "Please select an image before checking.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Identifies the selection a preview decode was started for.
pub type Generation = u64;

/// The file the user picked, with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub media_type: String,
}

impl SelectedImage {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }

    /// Declares the media type from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = media_type_for(&path).to_string();
        Self { path, media_type }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn media_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return FALLBACK_MEDIA_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// Decoded, displayable form of a selected image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact {
    pub source_width: u32,
    pub source_height: u32,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    /// Thumbnail pixels, RGBA8, row-major.
    pub rgba: Vec<u8>,
}

/// Result of one submission as seen by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Verdict(ClassificationResult),
    /// Non-success HTTP status; `message` is already resolved from the body.
    ServerError { status: u16, message: String },
    /// The request did not complete or the reply could not be understood.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
enum PreviewSlot {
    Empty,
    Decoding,
    Ready(PreviewArtifact),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
enum ResultSlot {
    Neutral,
    Verdict {
        file_name: String,
        result: ClassificationResult,
    },
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    selected: Option<SelectedImage>,
    generation: Generation,
    preview: PreviewSlot,
    /// File name of the submission in flight, if any.
    in_flight: Option<String>,
    result: ResultSlot,
    server_status: Option<Result<String, String>>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selected: None,
            generation: 0,
            preview: PreviewSlot::Empty,
            in_flight: None,
            result: ResultSlot::Neutral,
            server_status: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            ui_state: self.ui_state(),
            submit_enabled: !self.is_submitting(),
            submit_label: if self.is_submitting() {
                BUSY_LABEL
            } else {
                IDLE_LABEL
            },
            selected_file: self.selected.as_ref().map(SelectedImage::file_name),
            preview: self.preview_view(),
            result: self.result_view(),
            server_status: self.server_status.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn ui_state(&self) -> UiState {
        if self.is_submitting() {
            return UiState::Submitting;
        }
        match &self.result {
            ResultSlot::Verdict { result, .. } => match result.verdict() {
                Verdict::Safe => UiState::Safe,
                Verdict::Unsafe => UiState::Unsafe,
                Verdict::Error => UiState::Error,
            },
            ResultSlot::Error(_) => UiState::Error,
            ResultSlot::Neutral if self.selected.is_some() => UiState::Previewing,
            ResultSlot::Neutral => UiState::Idle,
        }
    }

    fn preview_view(&self) -> PreviewView {
        let file_name = match &self.selected {
            Some(image) => image.file_name(),
            None => return PreviewView::Placeholder(NO_IMAGE_PLACEHOLDER),
        };
        match &self.preview {
            PreviewSlot::Empty | PreviewSlot::Decoding => PreviewView::Decoding { file_name },
            PreviewSlot::Ready(artifact) => PreviewView::Image {
                file_name,
                width: artifact.source_width,
                height: artifact.source_height,
            },
            PreviewSlot::Failed(message) => PreviewView::Unavailable {
                file_name,
                message: message.clone(),
            },
        }
    }

    fn result_view(&self) -> ResultView {
        match &self.result {
            ResultSlot::Neutral => ResultView::Neutral,
            ResultSlot::Error(message) => ResultView::Error(message.clone()),
            ResultSlot::Verdict { file_name, result } => ResultView::Verdict(VerdictView {
                verdict: result.verdict(),
                file_name: file_name.clone(),
                status: result.status.clone(),
                reason: result.reason.clone(),
                confidence: format_confidence(result.confidence),
                details: result.details_json(),
            }),
        }
    }

    /// Replaces the selection, invalidates pending previews and clears the result area.
    /// Returns the generation the new selection's preview belongs to.
    pub(crate) fn select(&mut self, image: Option<SelectedImage>) -> Generation {
        self.generation += 1;
        self.preview = if image.is_some() {
            PreviewSlot::Decoding
        } else {
            PreviewSlot::Empty
        };
        self.selected = image;
        self.result = ResultSlot::Neutral;
        self.dirty = true;
        self.generation
    }

    /// Applies a decode completion; stale generations are ignored.
    pub(crate) fn apply_preview(
        &mut self,
        generation: Generation,
        result: Result<PreviewArtifact, String>,
    ) -> bool {
        if generation != self.generation || self.selected.is_none() {
            return false;
        }
        self.preview = match result {
            Ok(artifact) => PreviewSlot::Ready(artifact),
            Err(message) => PreviewSlot::Failed(message),
        };
        self.dirty = true;
        true
    }

    pub(crate) fn begin_submission(&mut self, file_name: String) {
        self.in_flight = Some(file_name);
        self.result = ResultSlot::Neutral;
        self.dirty = true;
    }

    /// Ends the in-flight submission and renders its outcome.
    pub(crate) fn finish_submission(&mut self, outcome: SubmissionOutcome) -> bool {
        let Some(file_name) = self.in_flight.take() else {
            return false;
        };
        self.result = match outcome {
            SubmissionOutcome::Verdict(result) => ResultSlot::Verdict { file_name, result },
            SubmissionOutcome::ServerError { message, .. } => ResultSlot::Error(message),
            SubmissionOutcome::Failed { message } if message.trim().is_empty() => {
                ResultSlot::Error(NETWORK_ERROR_MESSAGE.to_string())
            }
            SubmissionOutcome::Failed { message } => ResultSlot::Error(message),
        };
        self.dirty = true;
        true
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.result = ResultSlot::Error(message.into());
        self.dirty = true;
    }

    pub(crate) fn set_server_status(&mut self, status: Result<String, String>) {
        self.server_status = Some(status);
        self.dirty = true;
    }
}
