use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use blog2pdf_core::{update, AppState, AppViewModel, Msg, Phase, SubmissionId};
use blog2pdf_engine::{ensure_output_dir, EngineError, PersistError};
use engine_logging::{engine_debug, engine_info};

use super::effects::EffectRunner;
use crate::config::AppConfig;

// Upper bound for a single wait when the deadline is not representable.
const MAX_WAIT_SLICE: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Owns the core state and feeds it messages from the user and the engine.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Result<Self, SessionError> {
        ensure_output_dir(&config.output_dir)?;
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(
            config.backend_settings(),
            config.output_dir.clone(),
            msg_tx.clone(),
        )?;
        Ok(Self {
            state: AppState::new(),
            runner,
            msg_tx,
            msg_rx,
        })
    }

    /// Sender for messages originating outside the session, e.g. user input.
    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn held_blobs(&self) -> usize {
        self.runner.held_blobs()
    }

    /// Applies `msg` and every message its effects produce synchronously.
    /// Returns the view when anything visible changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            engine_debug!("dispatch {:?}", msg);
            if let Some(submission) = response_submission(&msg) {
                if self.state.active_submission() != Some(submission) {
                    engine_debug!(
                        "discarding response for submission {} (active {:?})",
                        submission,
                        self.state.active_submission()
                    );
                }
            }
            let before = self.state.phase();
            let submission = self.state.active_submission();
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            log_transition(before, &self.state, submission);
            queue.extend(self.runner.run(effects));
        }
        let view = self.state.view();
        if self.state.consume_dirty() {
            Some(view)
        } else {
            None
        }
    }

    /// Blocks until the next message arrives.
    pub fn next_msg(&self) -> Option<Msg> {
        self.msg_rx.recv().ok()
    }

    /// Pumps engine messages until the current submission settles or
    /// `timeout` elapses. Returns the views rendered along the way.
    pub fn run_until_settled(&mut self, timeout: Duration) -> Vec<AppViewModel> {
        let deadline = Instant::now().checked_add(timeout);
        let mut views = Vec::new();
        while self.state.is_loading() {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => MAX_WAIT_SLICE,
            };
            if remaining.is_zero() {
                engine_info!("submission did not settle within {:?}", timeout);
                break;
            }
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => views.extend(self.dispatch(msg)),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        views
    }

    /// Tears the view down and frees every held payload.
    pub fn close(&mut self) {
        self.dispatch(Msg::ViewClosed);
        let released = self.runner.release_all();
        if released > 0 {
            engine_debug!("released {} payloads on close", released);
        }
    }
}

fn response_submission(msg: &Msg) -> Option<SubmissionId> {
    match msg {
        Msg::AccessibilityChecked { submission, .. }
        | Msg::ConversionProgress { submission, .. }
        | Msg::ConversionFinished { submission, .. } => Some(*submission),
        _ => None,
    }
}

fn log_transition(before: Phase, state: &AppState, submission: Option<SubmissionId>) {
    let after = state.phase();
    if before == after {
        return;
    }
    let view = state.view();
    match after {
        Phase::Done => {
            if let Some(download) = &view.download {
                engine_info!(
                    "submission {:?} converted: {} ({} bytes)",
                    submission,
                    download.filename,
                    download.byte_len
                );
            }
        }
        Phase::Error => engine_info!(
            "submission {:?} failed in {:?}: {}",
            submission,
            before,
            view.error_message.as_deref().unwrap_or_default()
        ),
        _ => engine_debug!("{:?} -> {:?}", before, after),
    }
}
