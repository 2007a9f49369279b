use std::path::PathBuf;

use crate::state::TaskStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file (drop target or picker).
    FileSelected { name: String, path: PathBuf },
    /// User triggered the upload control.
    UploadClicked,
    /// Upload accepted; the backend returned a task handle.
    UploadSucceeded { task_id: String },
    /// Upload rejected or its response was unusable.
    UploadFailed { message: String },
    /// One report from the status poller.
    StatusReport {
        status: TaskStatus,
        status_message: Option<String>,
        result: Option<String>,
        error_message: Option<String>,
    },
    /// Polling aborted at the transport level; no further ticks will come.
    PollFailed { message: String },
    /// Restore the pristine surfaces (also runs once at startup).
    Reset,
    /// Fallback for placeholder wiring.
    NoOp,
}
