pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod review;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServiceConfig;
use crate::review::Reviewer;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    /// Config file to use instead of `~/.config/qm-review/config.toml`
    config: Option<PathBuf>,

    #[arg(short, long, env = "QM_REVIEW_LLM")]
    /// LLM configuration to use
    llm: Option<String>,

    #[arg(long)]
    /// Address to bind
    host: Option<String>,

    #[arg(short, long)]
    /// Port to listen on
    port: Option<u16>,

    #[arg(long)]
    /// Print the effective configuration as TOML and exit
    print_config: bool,
}

fn load_config(args: &Args) -> Result<ServiceConfig> {
    let base = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)?,
        None => ServiceConfig::load_default()?,
    };

    Ok(base
        .with_env_overrides(|name| std::env::var(name).ok())
        .with_cli_overrides(args.host.clone(), args.port))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let args = Args::parse();
    let svconfig = load_config(&args).context("Failed to load configuration")?;

    if args.print_config {
        println!("{}", toml::to_string_pretty(&svconfig.redacted())?);
        return Ok(());
    }

    let llm_config = svconfig.select_llm_config(args.llm.as_deref())?;
    let api_key = llm_config.resolve_api_key(|name| std::env::var(name).ok());
    if api_key.is_none() {
        warn!(
            env = llm_config.api_key_env(),
            "no API key configured; reviews will fail until one is set"
        );
    }

    let provider = llm::create_llm_provider(&llm_config);
    info!(
        provider = %provider.get_provider_name(),
        model = %llm_config.model_id,
        "using LLM configuration `{}`",
        llm_config.configuration_name
    );

    let state = AppState {
        reviewer: Arc::new(Reviewer::new(provider, llm_config, api_key)),
        server: Arc::new(svconfig.server.clone()),
    };
    let app = api::router(state, &svconfig.cors);

    let bind = (svconfig.server.host.as_str(), svconfig.server.port);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind.0, bind.1))?;
    let addr = listener.local_addr()?;

    info!("listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
