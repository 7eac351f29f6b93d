use crate::state::NOT_ACCESSIBLE_FALLBACK;
use crate::{validate_url, AppState, Effect, Msg, Phase, SaveStatus, SubmissionId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::ProbeBackend],
        Msg::InputChanged(text) => {
            state.set_url(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::BackendProbed(status) => {
            state.set_backend(status);
            Vec::new()
        }
        Msg::AccessibilityChecked { submission, result } => {
            if !accepts(&state, submission, Phase::Checking) {
                return (state, Vec::new());
            }
            if result.accessible {
                state.begin_conversion();
                vec![Effect::Convert {
                    submission,
                    url: state.submitted_url().to_string(),
                }]
            } else {
                let message = result
                    .error
                    .unwrap_or_else(|| NOT_ACCESSIBLE_FALLBACK.to_string());
                release_effects(state.fail(message))
            }
        }
        Msg::ConversionProgress { submission, stage } => {
            if accepts(&state, submission, Phase::Converting) {
                state.set_progress(stage);
            }
            Vec::new()
        }
        Msg::ConversionFinished { submission, result } => {
            if !accepts(&state, submission, Phase::Converting) {
                // A stale payload is never shown, so free it right away.
                return match result {
                    Ok(handle) => (
                        state,
                        vec![Effect::ReleaseResult {
                            blob_id: handle.blob_id,
                        }],
                    ),
                    Err(_) => (state, Vec::new()),
                };
            }
            match result {
                Ok(handle) => release_effects(state.complete(handle)),
                Err(message) => release_effects(state.fail(message)),
            }
        }
        Msg::DownloadClicked => match state.result() {
            Some(handle) => vec![Effect::SaveResult {
                handle: handle.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ResultSaved { blob_id, path } => {
            if is_current_blob(&state, blob_id) {
                state.set_save_status(SaveStatus::Saved(path));
            }
            Vec::new()
        }
        Msg::SaveFailed { blob_id, message } => {
            if is_current_blob(&state, blob_id) {
                state.set_save_status(SaveStatus::Failed(message));
            }
            Vec::new()
        }
        Msg::ViewClosed => release_effects(state.take_result()),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // The submit control is disabled while a submission is in flight.
    if state.is_loading() {
        return Vec::new();
    }

    let (submission, superseded) = state.begin_submission();
    let mut effects = release_effects(superseded);

    let validation = validate_url(state.submitted_url());
    match validation.error {
        Some(message) if !validation.valid => {
            effects.extend(release_effects(state.fail(message.to_string())));
        }
        _ => {
            state.begin_check();
            effects.push(Effect::CheckAccessibility {
                submission,
                url: state.submitted_url().to_string(),
            });
        }
    }
    effects
}

fn accepts(state: &AppState, submission: SubmissionId, phase: Phase) -> bool {
    state.is_active(submission) && state.phase() == phase
}

fn is_current_blob(state: &AppState, blob_id: u64) -> bool {
    state.result().is_some_and(|handle| handle.blob_id == blob_id)
}

fn release_effects(handle: Option<crate::ResultHandle>) -> Vec<Effect> {
    handle
        .map(|handle| Effect::ReleaseResult {
            blob_id: handle.blob_id,
        })
        .into_iter()
        .collect()
}
