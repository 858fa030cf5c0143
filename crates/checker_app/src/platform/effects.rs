use checker_core::{ClassificationResult, Effect, Msg, SubmissionOutcome};
use checker_engine::{EngineEvent, EngineHandle, FailureKind, SubmitError};
use checker_logging::{checker_info, checker_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::DecodePreview { generation, image } => {
                    checker_info!(
                        "DecodePreview generation={} path={}",
                        generation,
                        image.path.display()
                    );
                    self.engine.decode_preview(generation, image);
                }
                Effect::SubmitImage { image } => {
                    checker_info!(
                        "SubmitImage path={} type={}",
                        image.path.display(),
                        image.media_type
                    );
                    self.engine.submit(image);
                }
                Effect::CheckHealth => self.engine.check_health(),
            }
        }
    }

    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PreviewDecoded { generation, result } => Msg::PreviewDecoded {
            generation,
            result: result.map_err(|err| {
                checker_warn!("Preview generation {} failed: {}", generation, err);
                err.to_string()
            }),
        },
        EngineEvent::SubmissionCompleted { result } => {
            Msg::SubmissionFinished(submission_outcome(result))
        }
        EngineEvent::HealthChecked { result } => {
            Msg::HealthChecked(result.map_err(|err| err.message))
        }
    }
}

fn submission_outcome(result: Result<ClassificationResult, SubmitError>) -> SubmissionOutcome {
    match result {
        Ok(result) => SubmissionOutcome::Verdict(result),
        Err(SubmitError {
            kind: FailureKind::HttpStatus(status),
            message,
        }) => SubmissionOutcome::ServerError { status, message },
        Err(err) => SubmissionOutcome::Failed {
            message: err.message,
        },
    }
}
