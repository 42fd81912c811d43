use std::sync::Arc;

use axum::extract::State;
use tokio::process::Command;

use crate::main_lib::AppState;

const JOURNAL_LINES: &str = "100";

/// Last journal lines of the service unit, as plain text.
pub async fn journal_tail(State(state): State<Arc<AppState>>) -> String {
    let output = Command::new("journalctl")
        .args(["-u", &state.journal_unit, "-n", JOURNAL_LINES, "--no-pager"])
        .output()
        .await;

    match output {
        Ok(output) => String::from_utf8_lossy(&output.stdout).into_owned(),
        Err(err) => {
            tracing::warn!("journalctl failed: {}", err);
            format!("Error: {}", err)
        }
    }
}
