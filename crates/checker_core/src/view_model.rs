use crate::result::Verdict;

/// Display state derived from the selection, the in-flight flag and the latest outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Previewing,
    Submitting,
    Safe,
    Unsafe,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewView {
    Placeholder(&'static str),
    Decoding { file_name: String },
    Image {
        file_name: String,
        width: u32,
        height: u32,
    },
    Unavailable { file_name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Neutral,
    Verdict(VerdictView),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictView {
    pub verdict: Verdict,
    pub file_name: String,
    pub status: String,
    pub reason: String,
    pub confidence: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub ui_state: UiState,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub selected_file: Option<String>,
    pub preview: PreviewView,
    pub result: ResultView,
    pub server_status: Option<Result<String, String>>,
    pub dirty: bool,
}
