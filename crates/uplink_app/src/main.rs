mod effects;
mod logging;

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{bail, Context};
use uplink_core::{update, Msg, SessionPhase, SessionState};
use uplink_logging::uplink_info;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::File);

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: uplink_app <file>")?;
    if !path.is_file() {
        bail!("not a file: {}", path.display());
    }
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    uplink_info!("uplink client starting file={name}");

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = effects::EffectRunner::new(msg_tx.clone())
        .map_err(|err| anyhow::anyhow!("client setup failed: {err}"))?;

    // Same sequence the interactive flow would produce: clean slate, pick
    // the file, trigger the upload.
    msg_tx.send(Msg::Reset)?;
    msg_tx.send(Msg::FileSelected { name, path })?;
    msg_tx.send(Msg::UploadClicked)?;

    let mut state = SessionState::new();
    let mut printed_entries = 0;

    loop {
        let msg = msg_rx.recv()?;
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        if !state.consume_dirty() {
            continue;
        }
        let view = state.view();

        // The log is newest-first; print entries added since last render in
        // chronological order.
        let fresh = view.status_log.len().saturating_sub(printed_entries);
        for line in view.status_log.iter().take(fresh).rev() {
            println!("{line}");
        }
        printed_entries = view.status_log.len();

        match view.phase {
            SessionPhase::Completed => {
                if let Some(result) = &view.result_text {
                    println!("{result}");
                }
                return Ok(());
            }
            SessionPhase::Failed => {
                if let Some(error) = &view.error_line {
                    eprintln!("{error}");
                }
                bail!("session failed");
            }
            _ => {}
        }
    }
}
