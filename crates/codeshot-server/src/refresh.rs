use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use codeshot_core::{CodeShotError, Result};

/// Give the listener a moment before telling the platform to call back.
const REFRESH_DELAY: Duration = Duration::from_secs(1);

/// Ask the platform to re-fetch this agent's prompt and few-shots:
/// `POST {refresh_url}/{agent_id}`.
pub async fn ping_refresh(refresh_url: &str, agent_id: &str) -> Result<()> {
    let url = format!("{}/{}", refresh_url.trim_end_matches('/'), agent_id);
    let resp = reqwest::Client::new()
        .post(&url)
        .send()
        .await
        .map_err(|e| CodeShotError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CodeShotError::Transport(format!(
            "refresh of {agent_id} returned HTTP {status}"
        )));
    }
    info!(agent_id, "platform refresh requested");
    Ok(())
}

/// Ping the refresh endpoint in the background. Failures are only logged.
pub fn spawn_refresh_ping(refresh_url: String, agent_id: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(REFRESH_DELAY).await;
        if let Err(e) = ping_refresh(&refresh_url, &agent_id).await {
            warn!(agent_id = %agent_id, error = %e, "failed to refresh agent");
        }
    })
}
