use crate::state::SessionPhase;

/// Everything a front end needs to draw the session, derived by
/// `SessionState::view`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub phase: SessionPhase,
    /// Newest-first progress messages.
    pub status_log: Vec<String>,
    /// Rendered result text; present only in the Completed phase.
    pub result_text: Option<String>,
    /// Error surface text, including the "Error: " prefix.
    pub error_line: Option<String>,
    /// Label for the upload trigger control.
    pub upload_label: String,
    pub upload_enabled: bool,
    /// File name line, or a prompt for a new file after a terminal outcome.
    pub file_display: String,
    /// True while an upload or poll is in flight (spinner surface).
    pub busy: bool,
    pub dirty: bool,
}
