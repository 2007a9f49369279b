//! Uplink core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod render;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use render::format_result_payload;
pub use state::{SelectedFile, SessionPhase, SessionState, StatusLog, TaskStatus};
pub use update::update;
pub use view_model::SessionView;
