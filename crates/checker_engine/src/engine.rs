use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use checker_core::{Generation, SelectedImage};
use checker_logging::checker_error;

use crate::preview::{load_preview, PreviewSettings};
use crate::submit::{ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{EngineEvent, FailureKind, SubmitError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] SubmitError),
}

enum EngineCommand {
    DecodePreview {
        generation: Generation,
        image: SelectedImage,
    },
    Submit {
        image: SelectedImage,
    },
    CheckHealth,
}

/// Runs previews and submissions on a background tokio runtime.
///
/// Every `submit` produces exactly one `EngineEvent::SubmissionCompleted`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(submit: SubmitSettings, preview: PreviewSettings) -> Result<Self, EngineError> {
        let submitter = Arc::new(ReqwestSubmitter::new(submit)?);
        Self::with_submitter(submitter, preview)
    }

    pub fn with_submitter(
        submitter: Arc<dyn Submitter>,
        preview: PreviewSettings,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let preview = Arc::new(preview);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let submitter = submitter.clone();
                let preview = preview.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(submitter, &preview, command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn decode_preview(&self, generation: Generation, image: SelectedImage) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::DecodePreview { generation, image });
    }

    pub fn submit(&self, image: SelectedImage) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { image });
    }

    pub fn check_health(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    submitter: Arc<dyn Submitter>,
    preview: &PreviewSettings,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::DecodePreview { generation, image } => EngineEvent::PreviewDecoded {
            generation,
            result: load_preview(&image.path, preview).await,
        },
        EngineCommand::Submit { image } => {
            // Run in its own task so a panic still yields a completion event.
            let task = tokio::spawn(async move { submitter.submit(&image).await });
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    checker_error!("Submission task failed: {}", err);
                    Err(SubmitError::new(FailureKind::Internal, err.to_string()))
                }
            };
            EngineEvent::SubmissionCompleted { result }
        }
        EngineCommand::CheckHealth => EngineEvent::HealthChecked {
            result: submitter.health().await,
        },
    };
    let _ = event_tx.send(event);
}
