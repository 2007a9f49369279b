use std::path::PathBuf;

use crate::view_model::SessionView;

/// Task lifecycle as reported by the backend status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Failure,
}

impl TaskStatus {
    /// Wire spelling; doubles as the display fallback when the backend
    /// sends no `status_message`.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Processing => "PROCESSING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
        }
    }
}

/// The file chosen for upload. At most one exists per session; it is
/// dropped on any terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Ordered, newest-first record of human-readable progress messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLog {
    entries: Vec<String>,
}

impl StatusLog {
    /// Prepends a message unconditionally.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.insert(0, message.into());
    }

    /// Prepends a message unless it repeats the newest entry.
    pub fn push_if_new(&mut self, message: &str) -> bool {
        if self.newest() == Some(message) {
            return false;
        }
        self.push(message);
        true
    }

    pub fn newest(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the session currently is in the upload -> poll -> render flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No file chosen yet.
    #[default]
    Idle,
    /// A file is chosen and the upload trigger is armed.
    FileSelected,
    /// Upload request in flight.
    Uploading,
    /// Task submitted; the status endpoint is being polled.
    Polling,
    /// Terminal: backend reported SUCCESS and the result is rendered.
    Completed,
    /// Terminal: upload rejected, polling aborted, or the task failed.
    Failed,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Failed)
    }
}

/// The whole UI session as one explicit value: phase, selected file, status
/// log, and the rendered result/error surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    phase: SessionPhase,
    selected: Option<SelectedFile>,
    task_id: Option<String>,
    log: StatusLog,
    result_text: Option<String>,
    error_text: Option<String>,
    dirty: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn view(&self) -> SessionView {
        let upload_label = match self.phase {
            SessionPhase::Idle | SessionPhase::FileSelected => "Upload & Process",
            SessionPhase::Uploading => "Uploading...",
            SessionPhase::Polling => "Processing...",
            SessionPhase::Completed => "Upload Another File",
            SessionPhase::Failed => "Upload Failed - Select New File",
        };
        let file_display = match (&self.selected, self.phase.is_terminal()) {
            (Some(file), _) => format!("Selected file: {}", file.name),
            (None, true) => "Select a new file to process.".to_string(),
            (None, false) => String::new(),
        };
        SessionView {
            phase: self.phase,
            status_log: self.log.entries().to_vec(),
            result_text: self.result_text.clone(),
            error_line: self.error_text.as_ref().map(|e| format!("Error: {e}")),
            upload_label: upload_label.to_string(),
            upload_enabled: self.phase == SessionPhase::FileSelected,
            file_display,
            busy: matches!(self.phase, SessionPhase::Uploading | SessionPhase::Polling),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn select_file(&mut self, name: String, path: PathBuf) {
        self.selected = Some(SelectedFile { name, path });
        self.reset_surfaces();
    }

    /// Clears the log and both output surfaces. The phase falls back to
    /// `FileSelected` or `Idle` depending on whether a file is held.
    pub(crate) fn reset_surfaces(&mut self) {
        self.log.clear();
        self.result_text = None;
        self.error_text = None;
        self.task_id = None;
        self.phase = if self.selected.is_some() {
            SessionPhase::FileSelected
        } else {
            SessionPhase::Idle
        };
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) {
        self.log.clear();
        self.result_text = None;
        self.error_text = None;
        self.phase = SessionPhase::Uploading;
        self.log.push("Starting upload...");
        self.mark_dirty();
    }

    pub(crate) fn begin_polling(&mut self, task_id: String) {
        self.task_id = Some(task_id);
        self.phase = SessionPhase::Polling;
        self.log
            .push("File uploaded successfully. Starting agent processing...");
        self.mark_dirty();
    }

    pub(crate) fn log_push(&mut self, message: impl Into<String>) {
        self.log.push(message);
        self.mark_dirty();
    }

    pub(crate) fn log_push_if_new(&mut self, message: &str) {
        if self.log.push_if_new(message) {
            self.mark_dirty();
        }
    }

    pub(crate) fn complete(&mut self, rendered: String) {
        self.log.push("Processing Complete!");
        self.result_text = Some(rendered);
        self.finish(SessionPhase::Completed);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.error_text = Some(message);
        self.finish(SessionPhase::Failed);
    }

    /// Common terminal bookkeeping: the selected file and task handle are
    /// dropped, so a new file must be chosen before the trigger re-arms.
    fn finish(&mut self, phase: SessionPhase) {
        self.phase = phase;
        self.selected = None;
        self.task_id = None;
        self.mark_dirty();
    }
}
