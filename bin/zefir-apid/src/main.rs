//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Binary entrypoint for the Zefir reporting API daemon."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};
use zefir_analytics::AppContext;
use zefir_api::{spawn_api_server, ApiState};
use zefir_common::config::AppConfig;
use zefir_common::logging::init_tracing;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Zefir reporting API daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "ADDR", help = "Override api.listen")]
    listen: Option<SocketAddr>,

    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print version information and exit"
    )]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Load every scenario and serve the API")]
    Serve,
    #[command(about = "Validate configuration and resource files, then exit")]
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("zefir-apid {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/zefir-api.toml"));
    candidates.push(PathBuf::from("configs/zefir-api.example.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(listen) = cli.listen {
        config.api.listen = listen;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            init_tracing("zefir-apid", &config.logging)?;
            match &loaded.source {
                Some(path) => info!(config_path = %path.display(), "configuration loaded"),
                None => info!("configuration defaults in use"),
            }
            serve(config).await?
        }
        Commands::Check => check(&config, loaded.source)?,
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    for path in config.paths.missing_resources() {
        warn!(path = %path.display(), "resource file missing");
    }

    let started = Instant::now();
    let context = AppContext::load(&config)?;
    info!(
        areas = context.areas().len(),
        scenarios = context.scenarios().count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scenario results loaded"
    );

    let state = Arc::new(ApiState::new(context));
    let server = spawn_api_server(state, config.api.listen, &config.api.cors_origins)?;
    info!(address = %server.addr(), "api server ready; waiting for termination signal");

    signal::ctrl_c().await?;
    info!("ctrl-c received; shutting down");
    server.shutdown().await?;
    Ok(())
}

fn check(config: &AppConfig, source: Option<PathBuf>) -> Result<()> {
    match source {
        Some(path) => println!("config: {}", path.display()),
        None => println!("config: built-in defaults"),
    }
    println!("listen: {}", config.api.listen);

    let missing = config.paths.missing_resources();
    if !missing.is_empty() {
        for path in &missing {
            println!("missing: {}", path.display());
        }
        bail!("{} required resource file(s) missing", missing.len());
    }

    let context = AppContext::load(config)?;
    println!("areas: {}", context.areas().len());
    println!("scenarios: {}", context.scenarios().count());
    Ok(())
}
