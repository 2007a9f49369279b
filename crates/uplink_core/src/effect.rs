use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit the selected file as multipart form data.
    BeginUpload { path: PathBuf },
    /// Start the fixed-interval status poller for a freshly returned task.
    BeginPolling { task_id: String },
    /// Cancel whatever upload or poll is currently in flight.
    CancelPolling,
}
