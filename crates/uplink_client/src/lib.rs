//! Uplink client: HTTP calls and the polling loop against the processing backend.
mod api;
mod handle;
mod poll;
mod types;

pub use api::{ApiClient, ClientSettings, DEFAULT_BACKEND_URL};
pub use handle::ClientHandle;
pub use poll::{poll_until_terminal, ChannelStatusSink, PollOutcome, PollSettings, StatusSink};
pub use types::{ApiError, SessionEvent, StatusReport, TaskId, TaskStatus};
