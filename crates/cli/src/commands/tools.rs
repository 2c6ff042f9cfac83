//! `sandeval tools`: print the sandbox tool catalog.

use sandeval_config::AppConfig;

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::connect_sandbox(&config).await?.ok_or(
        "No sandbox configured. Set MCP_SERVER_URL or [sandbox].server_url in the config file.",
    )?;

    let listed = session.list_tools().await;
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "Failed to close sandbox session");
    }
    let tools = listed?;

    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}
