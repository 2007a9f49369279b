use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Opaque identifier correlating an upload to its asynchronous processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task lifecycle values the status endpoint may report. Anything else in
/// the `status` field fails deserialization and surfaces as
/// [`ApiError::MalformedResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Failure,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }
}

/// One validated response from the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub status: TaskStatus,
    /// Preferred display text over the raw status value.
    #[serde(default)]
    pub status_message: Option<String>,
    /// Raw result payload, present on SUCCESS. Possibly JSON-encoded text;
    /// rendering decides.
    #[serde(default)]
    pub result: Option<String>,
    /// Failure reason, present on FAILURE.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// 2xx body of the upload endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Optional non-2xx body of the upload endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Transport-level and protocol-level failures. Messages are owned strings
/// so events stay cheap to clone and comparable in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Upload rejected with a non-success HTTP status. The message prefers
    /// the server-supplied `detail` field over the status line.
    #[error("{message}")]
    UploadRejected { status: u16, message: String },
    /// Upload accepted but the response carried no task identifier.
    #[error("no task ID returned")]
    MissingTaskId,
    /// Status endpoint answered with a non-success HTTP status.
    #[error("polling failed: {message}")]
    Http { status: u16, message: String },
    /// Connection, DNS, or timeout failure below HTTP.
    #[error("{0}")]
    Network(String),
    /// Response body did not match the expected schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Selected file could not be read.
    #[error("{0}")]
    File(String),
    /// The surrounding session was cancelled.
    #[error("cancelled")]
    Cancelled,
}

/// Events emitted by [`crate::ClientHandle`] toward the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Upload request finished, one way or the other.
    UploadFinished { result: Result<TaskId, ApiError> },
    /// One status report observed by the poller.
    Status(StatusReport),
    /// Polling stopped on a transport or schema error (never on SUCCESS,
    /// FAILURE, or cancellation).
    PollAborted(ApiError),
}
