use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tokio_util::sync::CancellationToken;
use uplink_logging::{uplink_info, uplink_warn};

use crate::poll::ChannelStatusSink;
use crate::{poll_until_terminal, ApiClient, ApiError, ClientSettings, PollSettings, SessionEvent, TaskId};

enum Command {
    Upload { path: PathBuf },
    Poll { task: TaskId },
    Cancel,
}

/// Handle to the client runtime thread.
///
/// Commands go in over a channel; [`SessionEvent`]s come back out via
/// [`ClientHandle::try_recv`]. At most one cancellation token is live:
/// every new upload or poll cancels the previous one before installing its
/// own, and `cancel` revokes whatever is currently in flight.
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<Command>,
    event_rx: Arc<Mutex<mpsc::Receiver<SessionEvent>>>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings, poll: PollSettings) -> Result<Self, ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = ApiClient::new(settings)?;
        let active: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    Command::Upload { path } => {
                        let token = replace_active(&active);
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        uplink_info!("upload starting path={}", path.display());
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {}
                                result = client.upload_document(&path) => {
                                    let _ = event_tx.send(SessionEvent::UploadFinished { result });
                                }
                            }
                        });
                    }
                    Command::Poll { task } => {
                        let token = replace_active(&active);
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        let poll = poll.clone();
                        uplink_info!("polling starting task_id={task}");
                        runtime.spawn(async move {
                            let sink = ChannelStatusSink::new(event_tx.clone());
                            match poll_until_terminal(&client, &task, &poll, &sink, &token).await {
                                // Terminal reports already went through the sink.
                                Ok(_outcome) => {}
                                Err(ApiError::Cancelled) => {}
                                Err(err) => {
                                    uplink_warn!("polling aborted task_id={task}: {err}");
                                    let _ = event_tx.send(SessionEvent::PollAborted(err));
                                }
                            }
                        });
                    }
                    Command::Cancel => cancel_active(&active),
                }
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn upload(&self, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(Command::Upload { path: path.into() });
    }

    pub fn poll(&self, task: TaskId) {
        let _ = self.cmd_tx.send(Command::Poll { task });
    }

    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(Command::Cancel);
    }

    pub fn try_recv(&self) -> Option<SessionEvent> {
        self.event_rx.lock().expect("lock event receiver").try_recv().ok()
    }
}

fn cancel_active(active: &Mutex<Option<CancellationToken>>) {
    if let Some(token) = active.lock().expect("lock cancellation slot").take() {
        token.cancel();
    }
}

/// Cancels the previous token, if any, and installs a fresh one.
fn replace_active(active: &Mutex<Option<CancellationToken>>) -> CancellationToken {
    let mut slot = active.lock().expect("lock cancellation slot");
    if let Some(previous) = slot.take() {
        previous.cancel();
    }
    let token = CancellationToken::new();
    *slot = Some(token.clone());
    token
}
