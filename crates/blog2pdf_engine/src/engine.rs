use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_warn};

use crate::client::{BackendClient, ChannelProgressSink, ReqwestBackend};
use crate::{BackendSettings, ClientError, EngineEvent, SubmissionId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("backend client: {0}")]
    Client(#[from] ClientError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Probe,
    Check { submission: SubmissionId, url: String },
    Convert { submission: SubmissionId, url: String },
}

/// Runs backend calls on a background tokio runtime and reports results as
/// [`EngineEvent`]s. Dropping the handle stops the worker thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        settings: BackendSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let client = ReqwestBackend::new(settings)?;
        Self::with_client(Arc::new(client), event_tx)
    }

    pub fn with_client(
        client: Arc<dyn BackendClient>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("blog2pdf-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, event_tx).await;
                    });
                }
                engine_debug!("engine command channel closed; shutting down");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn probe(&self) {
        self.send(EngineCommand::Probe);
    }

    pub fn check(&self, submission: SubmissionId, url: impl Into<String>) {
        self.send(EngineCommand::Check {
            submission,
            url: url.into(),
        });
    }

    pub fn convert(&self, submission: SubmissionId, url: impl Into<String>) {
        self.send(EngineCommand::Convert {
            submission,
            url: url.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    client: &dyn BackendClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Probe => EngineEvent::BackendProbed(client.health().await),
        EngineCommand::Check { submission, url } => EngineEvent::AccessibilityChecked {
            submission,
            result: client.check_accessible(&url).await,
        },
        EngineCommand::Convert { submission, url } => {
            let sink = ChannelProgressSink::new(submission, event_tx.clone());
            EngineEvent::ConversionCompleted {
                submission,
                result: client.convert(&url, &sink).await,
            }
        }
    };
    let _ = event_tx.send(event);
}
