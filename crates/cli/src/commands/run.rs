//! `sandeval run`: evaluate the agent against a task file.

use sandeval_agent::AgentLoop;
use sandeval_config::AppConfig;
use sandeval_core::provider::ToolDefinition;
use sandeval_core::tool::{NoTools, ToolInvoker};
use sandeval_eval::{Evaluator, TaskFile};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(
    mut config: AppConfig,
    tasks_path: &Path,
    max_iterations: Option<u32>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(max) = max_iterations {
        config.agent.max_iterations = max;
    }

    if !config.has_api_key() {
        return Err(format!(
            "No API key configured. Set AZURE_OPENAI_API_KEY (or OPENAI_API_KEY / SANDEVAL_API_KEY), \
             or add api_key under [provider] in {}",
            AppConfig::config_dir().join("config.toml").display()
        )
        .into());
    }

    let task_file = TaskFile::load(tasks_path)?;
    let provider = sandeval_providers::build_from_config(&config.provider)?;

    // The sandbox session is shared by every task and closed once at the end.
    // Nothing between connect and close may return early.
    let session = super::connect_sandbox(&config).await?.map(Arc::new);
    let (invoker, tools): (Arc<dyn ToolInvoker>, Vec<ToolDefinition>) = match &session {
        Some(session) => {
            for upload in &config.sandbox.uploads {
                if !session.upload_file(&upload.local_path, &upload.remote_path).await {
                    warn!(
                        local = %upload.local_path.display(),
                        remote = %upload.remote_path,
                        "Continuing without uploaded file"
                    );
                }
            }
            let tools = session.tool_catalog().await;
            info!(tools = tools.len(), "Retrieved sandbox tools");
            let invoker: Arc<dyn ToolInvoker> = session.clone();
            (invoker, tools)
        }
        None => {
            warn!("No sandbox configured, running without tools");
            let invoker: Arc<dyn ToolInvoker> = Arc::new(NoTools);
            (invoker, Vec::new())
        }
    };

    let mut agent = AgentLoop::new(provider, invoker, &config.provider.model)
        .with_max_iterations(config.agent.max_iterations)
        .with_max_tokens(config.provider.max_tokens);
    if let Some(prompt) = &config.agent.system_prompt_override {
        agent = agent.with_system_prompt(prompt);
    }
    if let Some(temperature) = config.provider.temperature {
        agent = agent.with_temperature(temperature);
    }

    let report = Evaluator::new(Arc::new(agent), tools)
        .with_policy(task_file.scoring)
        .run(&task_file.tasks)
        .await;

    if let Some(session) = &session {
        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close sandbox session");
        }
    }

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| format!("Failed to write report to {}: {e}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{json}"),
    }

    info!(
        correct = report.summary.correct,
        total = report.summary.total,
        "Accuracy: {:.1}%",
        report.summary.accuracy
    );
    Ok(())
}
