mod cli;

use anyhow::Context;
use concierge_agent::ConciergeService;
use concierge_common::SessionId;
use concierge_config::ConciergeConfig;
use concierge_server::http;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

const DEFAULT_DIRECTIVE: &str = "concierge=info";

/// `--log-level debug` means `concierge=debug`; full directives pass through.
fn log_directive(cli_level: Option<&str>, config: Option<&ConciergeConfig>) -> String {
    match cli_level {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("concierge={level}"),
        None => config
            .map(|c| c.logging.level.directive())
            .unwrap_or(DEFAULT_DIRECTIVE)
            .to_string(),
    }
}

/// `RUST_LOG` wins when set.
fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let args = cli::parse();

    let loaded = concierge_config::load_config(args.config.as_deref());
    init_logging(&log_directive(args.log_level.as_deref(), loaded.as_ref().ok()));

    if let Ok(path) = dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }
    tracing::info!("concierge v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            return Err(e).context("failed to load config");
        }
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {e}");
            ConciergeConfig::default()
        }
    };

    match args.command {
        Some(Command::Ask { message, session }) => {
            let service = ConciergeService::from_config(&config)?;
            let session_id = session.map(SessionId::from).unwrap_or_default();
            let result = service.send_message(&session_id, &message).await;
            println!("{}", result.response);
            if let Some(category) = result.category {
                tracing::info!(session_id = %session_id, category = %category, "answered");
            }
            if !result.success {
                anyhow::bail!(result.error.unwrap_or_else(|| "request failed".to_string()));
            }
        }
        Some(Command::Config) => println!("{}", concierge_config::config_to_json(&config)),
        Some(Command::Serve { port }) => serve(config, port).await?,
        None => serve(config, None).await?,
    }
    Ok(())
}

async fn serve(mut config: ConciergeConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    let service = ConciergeService::from_config(&config)?;
    http::run_http(
        service,
        &config.server.bind_addr(),
        config.server.turn_timeout_secs,
    )
    .await
}
