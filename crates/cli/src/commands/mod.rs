pub mod run;
pub mod tools;

use sandeval_config::AppConfig;
use sandeval_tools::McpSession;
use std::path::Path;
use std::time::Duration;

/// Load the config file (explicit or default location) plus environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(config)
}

/// Open a session with the configured sandbox, if there is one.
pub async fn connect_sandbox(
    config: &AppConfig,
) -> Result<Option<McpSession>, Box<dyn std::error::Error>> {
    let Some(url) = &config.sandbox.server_url else {
        return Ok(None);
    };
    let timeout = Duration::from_secs(config.sandbox.timeout_secs);
    let session = McpSession::connect(url.clone(), timeout)
        .await
        .map_err(|e| format!("Failed to connect to sandbox at {url}: {e}"))?;
    Ok(Some(session))
}
