use std::fmt;

use checker_core::{ClassificationResult, Generation, PreviewArtifact};

use crate::preview::PreviewError;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PreviewDecoded {
        generation: Generation,
        result: Result<PreviewArtifact, PreviewError>,
    },
    SubmissionCompleted {
        result: Result<ClassificationResult, SubmitError>,
    },
    HealthChecked {
        result: Result<String, SubmitError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-success status; the error message holds the server's `detail`.
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// The image file could not be read before sending.
    Io,
    MalformedResponse,
    Network,
    /// The submission task itself failed before producing an outcome.
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "file read error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Internal => write!(f, "internal error"),
        }
    }
}
