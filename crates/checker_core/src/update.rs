use checker_logging::{checker_debug, checker_info, checker_warn};

use crate::{AppState, Effect, Msg, SubmissionOutcome, MISSING_IMAGE_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(image) => {
            match &image {
                Some(image) => checker_info!(
                    "Selected {} ({})",
                    image.path.display(),
                    image.media_type
                ),
                None => checker_info!("Selection cleared"),
            }
            let generation = state.select(image.clone());
            match image {
                Some(image) => vec![Effect::DecodePreview { generation, image }],
                None => Vec::new(),
            }
        }
        Msg::PreviewDecoded { generation, result } => {
            if !state.apply_preview(generation, result) {
                checker_debug!(
                    "Discarding stale preview generation={} current={}",
                    generation,
                    state.generation()
                );
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.is_submitting() {
                // The control is disabled while in flight; late clicks are dropped.
                return (state, Vec::new());
            }
            match state.selected().cloned() {
                None => {
                    state.show_error(MISSING_IMAGE_MESSAGE);
                    Vec::new()
                }
                Some(image) => {
                    checker_info!("Submitting {}", image.path.display());
                    state.begin_submission(image.file_name());
                    vec![Effect::SubmitImage { image }]
                }
            }
        }
        Msg::SubmissionFinished(outcome) => {
            log_outcome(&outcome);
            if !state.finish_submission(outcome) {
                checker_warn!("Submission outcome arrived with nothing in flight");
            }
            Vec::new()
        }
        Msg::HealthCheckClicked => vec![Effect::CheckHealth],
        Msg::HealthChecked(status) => {
            state.set_server_status(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn log_outcome(outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Verdict(result) => checker_info!(
            "Verdict status={} confidence={}",
            result.status,
            result.confidence
        ),
        SubmissionOutcome::ServerError { status, message } => {
            checker_warn!("Server rejected submission: {} {}", status, message)
        }
        SubmissionOutcome::Failed { message } => {
            checker_warn!("Submission failed: {}", message)
        }
    }
}
