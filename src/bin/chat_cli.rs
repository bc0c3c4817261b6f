//! Terminal chat with the `DeepSeek` agent

use deepseek_chat::agent::{ChatAgent, AGENT_ID, AGENT_NAME};
use deepseek_chat::cli::{self, MISSING_KEY_MESSAGE};
use deepseek_chat::config::{load_env_file, ChatConfig};
use deepseek_chat::llm::service_from_config;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays a clean conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepseek_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    load_env_file(None);
    let config = ChatConfig::from_env();
    let Some(llm) = service_from_config(&config)? else {
        eprintln!("{MISSING_KEY_MESSAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let agent = ChatAgent::new(llm, &config);
    tracing::info!(agent = AGENT_ID, agent_name = AGENT_NAME, model = %agent.model_id(), "Agent ready");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    cli::run(&agent, stdin, &mut stdout, &mut stderr).await?;

    Ok(ExitCode::SUCCESS)
}
