use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{ApiClient, ApiError, SessionEvent, StatusReport, TaskId, TaskStatus};

/// Cadence settings for the status poller.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
        }
    }
}

/// Receives every status report the poller observes, terminal ones included.
pub trait StatusSink: Send + Sync {
    fn report(&self, report: StatusReport);
}

/// Sink forwarding reports over an mpsc channel as [`SessionEvent`]s.
pub struct ChannelStatusSink {
    tx: std::sync::mpsc::Sender<SessionEvent>,
}

impl ChannelStatusSink {
    pub fn new(tx: std::sync::mpsc::Sender<SessionEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelStatusSink {
    fn report(&self, report: StatusReport) {
        let _ = self.tx.send(SessionEvent::Status(report));
    }
}

/// Terminal outcome of one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Backend finished the task; payload is the raw result text, if any.
    Succeeded { result: Option<String> },
    /// Backend reported the task as failed.
    Failed { error_message: Option<String> },
}

/// Queries the status endpoint at a fixed interval until a terminal status,
/// a transport failure, or cancellation.
///
/// Any [`ApiError`] from a tick ends the loop immediately (fail fast, no
/// retry). There is deliberately no tick ceiling: a task that never reaches
/// a terminal status keeps the loop alive until `cancel` fires.
pub async fn poll_until_terminal(
    client: &ApiClient,
    task: &TaskId,
    settings: &PollSettings,
    sink: &dyn StatusSink,
    cancel: &CancellationToken,
) -> Result<PollOutcome, ApiError> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            _ = tokio::time::sleep(settings.interval) => {}
        }

        let report = client.task_status(task).await?;
        sink.report(report.clone());

        match report.status {
            TaskStatus::Success => {
                return Ok(PollOutcome::Succeeded {
                    result: report.result,
                })
            }
            TaskStatus::Failure => {
                return Ok(PollOutcome::Failed {
                    error_message: report.error_message,
                })
            }
            TaskStatus::Pending | TaskStatus::Processing => {}
        }
    }
}
