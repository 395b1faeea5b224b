//! Garment agent CLI entry point

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::Result;
use tracing::debug;

use garmentagent::cli::{Cli, Command};
use garmentagent::config::Config;
use garmentagent::domain::FinalStatus;
use garmentagent::orchestrator::{InputData, Orchestrator, RequestPayload};
use garmentagent::planner::TemplatePlanner;
use garmentagent::retrieval::StaticKnowledgeBase;
use garmentagent::tools::ToolRegistry;
use sessionstore::SessionStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

/// Assemble the default runtime: builtin tools, template planner, fresh
/// session store, and optionally the static knowledge base.
fn build_orchestrator(config: &Config) -> Orchestrator {
    debug!(max_retries = config.max_retries, "build_orchestrator: called");
    let registry = Arc::new(ToolRegistry::with_builtins());
    let sessions = Arc::new(SessionStore::with_capacity(config.history_capacity));

    let mut orchestrator = Orchestrator::new(Arc::new(TemplatePlanner::new()), registry)
        .with_max_retries(config.max_retries)
        .with_sessions(sessions);
    if config.enable_retrieval {
        orchestrator = orchestrator.with_retriever(Arc::new(StaticKnowledgeBase::new()));
    }
    orchestrator
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref())?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref())?;

    match cli.command {
        Command::Request { text, image, session } => {
            let payload = RequestPayload {
                input_data: InputData {
                    text,
                    has_image: image.is_some(),
                    image_path: image,
                },
                session_id: None,
            };

            let orchestrator = build_orchestrator(&config);
            let session_id = session.as_deref().or(Some(config.default_session_id.as_str()));
            let result = orchestrator.process_request(payload, session_id).await?;

            let status_line = format!("status: {}", result.status);
            match result.status {
                FinalStatus::Success => println!("{}", status_line.as_str().green()),
                FinalStatus::Failed => println!("{}", status_line.as_str().red()),
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Tools => {
            let registry = ToolRegistry::with_builtins();
            for name in registry.names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
