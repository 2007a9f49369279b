use crate::render::format_result_payload;
use crate::state::TaskStatus;
use crate::{Effect, Msg, SessionPhase, SessionState};

const NO_RESULT_PLACEHOLDER: &str = "Processing complete, but no result data received.";
const UNKNOWN_PROCESSING_ERROR: &str = "Unknown processing error";

/// Pure update function: applies a message to the session and returns any
/// effects the IO layer should run.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected { name, path } => {
            let mut effects = Vec::new();
            // Invariant: one live poller at most. Reselecting while work is
            // in flight must kill it before the new session starts.
            if matches!(
                state.phase(),
                SessionPhase::Uploading | SessionPhase::Polling
            ) {
                effects.push(Effect::CancelPolling);
            }
            state.select_file(name, path);
            effects
        }
        Msg::UploadClicked => {
            if state.phase() != SessionPhase::FileSelected {
                return (state, Vec::new());
            }
            match state.selected_file().map(|file| file.path.clone()) {
                Some(path) => {
                    state.begin_upload();
                    vec![Effect::BeginUpload { path }]
                }
                None => Vec::new(),
            }
        }
        Msg::UploadSucceeded { task_id } => {
            if state.phase() != SessionPhase::Uploading {
                // Stale completion from a cancelled upload.
                return (state, Vec::new());
            }
            state.begin_polling(task_id.clone());
            vec![Effect::BeginPolling { task_id }]
        }
        Msg::UploadFailed { message } => {
            if state.phase() != SessionPhase::Uploading {
                return (state, Vec::new());
            }
            state.log_push(format!("Error during upload: {message}"));
            state.fail(format!("Upload failed: {message}"));
            Vec::new()
        }
        Msg::StatusReport {
            status,
            status_message,
            result,
            error_message,
        } => {
            if state.phase() != SessionPhase::Polling {
                // Stale report from a cancelled poller.
                return (state, Vec::new());
            }
            let display = status_message.unwrap_or_else(|| status.label().to_string());
            // PENDING is pre-work noise; everything else is logged once.
            if status != TaskStatus::Pending {
                state.log_push_if_new(&display);
            }
            match status {
                TaskStatus::Success => {
                    let payload = result.unwrap_or_else(|| NO_RESULT_PLACEHOLDER.to_string());
                    state.complete(format_result_payload(&payload));
                }
                TaskStatus::Failure => {
                    let reason =
                        error_message.unwrap_or_else(|| UNKNOWN_PROCESSING_ERROR.to_string());
                    state.log_push(format!("Processing failed: {reason}"));
                    state.fail(format!("Processing failed: {reason}"));
                }
                TaskStatus::Pending | TaskStatus::Processing => {}
            }
            Vec::new()
        }
        Msg::PollFailed { message } => {
            if state.phase() != SessionPhase::Polling {
                return (state, Vec::new());
            }
            state.log_push(format!(
                "Error during status check: {message}. Stopping polling."
            ));
            state.fail(format!("Error checking status: {message}"));
            Vec::new()
        }
        Msg::Reset => {
            let mut effects = Vec::new();
            if matches!(
                state.phase(),
                SessionPhase::Uploading | SessionPhase::Polling
            ) {
                effects.push(Effect::CancelPolling);
            }
            state.reset_surfaces();
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
