use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use uplink_client::{ApiError, ClientHandle, ClientSettings, PollSettings, SessionEvent, TaskId};
use uplink_core::{Effect, Msg};
use uplink_logging::{uplink_info, uplink_warn};

/// Bridges core effects to the client runtime and client events back to
/// core messages.
pub struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> Result<Self, ApiError> {
        let client = ClientHandle::new(ClientSettings::default(), PollSettings::default())?;
        let runner = Self { client };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::BeginUpload { path } => {
                    uplink_info!("BeginUpload path={}", path.display());
                    self.client.upload(path);
                }
                Effect::BeginPolling { task_id } => {
                    uplink_info!("BeginPolling task_id={task_id}");
                    self.client.poll(TaskId::new(task_id));
                }
                Effect::CancelPolling => {
                    uplink_info!("CancelPolling");
                    self.client.cancel();
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let client = self.client.clone();
        thread::spawn(move || loop {
            if let Some(event) = client.try_recv() {
                let msg = match event {
                    SessionEvent::UploadFinished { result } => match result {
                        Ok(task_id) => Msg::UploadSucceeded {
                            task_id: task_id.as_str().to_string(),
                        },
                        Err(err) => {
                            uplink_warn!("upload failed: {err}");
                            Msg::UploadFailed {
                                message: err.to_string(),
                            }
                        }
                    },
                    SessionEvent::Status(report) => Msg::StatusReport {
                        status: map_status(report.status),
                        status_message: report.status_message,
                        result: report.result,
                        error_message: report.error_message,
                    },
                    SessionEvent::PollAborted(err) => {
                        uplink_warn!("polling aborted: {err}");
                        Msg::PollFailed {
                            message: err.to_string(),
                        }
                    }
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_status(status: uplink_client::TaskStatus) -> uplink_core::TaskStatus {
    match status {
        uplink_client::TaskStatus::Pending => uplink_core::TaskStatus::Pending,
        uplink_client::TaskStatus::Processing => uplink_core::TaskStatus::Processing,
        uplink_client::TaskStatus::Success => uplink_core::TaskStatus::Success,
        uplink_client::TaskStatus::Failure => uplink_core::TaskStatus::Failure,
    }
}
