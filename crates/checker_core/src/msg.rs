#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a file, or cleared the selection with `None`.
    FileSelected(Option<crate::SelectedImage>),
    /// User activated the submit control.
    SubmitClicked,
    /// Engine finished decoding a preview.
    PreviewDecoded {
        generation: crate::Generation,
        result: Result<crate::PreviewArtifact, String>,
    },
    /// Engine finished a submission, successfully or not.
    SubmissionFinished(crate::SubmissionOutcome),
    /// User asked whether the classification service is up.
    HealthCheckClicked,
    /// Engine answered a health check.
    HealthChecked(Result<String, String>),
    /// Fallback for placeholder wiring.
    NoOp,
}
