use std::path::PathBuf;

use clap::Parser;
use cloudflare_exporter::{
    actors::PollerHandle,
    api::spawn_metrics_server,
    config::{Config, read_config_file},
    context::AppContext,
    util::get_log_level,
};
use tracing::{error, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
#[command(about = "Republishes Cloudflare zone analytics as Prometheus gauges")]
struct Args {
    /// Optional JSON config file overriding environment settings
    #[arg(short)]
    file: Option<PathBuf>,

    /// Load environment variables from this file instead of `.env`
    #[arg(short, long)]
    env_file: Option<PathBuf>,
}

fn load_env(args: &Args) -> Result<PathBuf, dotenv::Error> {
    match &args.env_file {
        Some(path) => dotenv::from_path(path).map(|_| path.clone()),
        None => dotenv::dotenv(),
    }
}

fn init() {
    let level = LevelFilter::from_level(get_log_level());
    let filter = filter::Targets::new().with_targets(vec![
        ("cloudflare_exporter", level),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // LOG_LEVEL may come from the env file, so it is loaded first
    let env_file = load_env(&args);
    init();
    trace!("started with args: {args:?}");

    match env_file {
        Ok(path) => info!("loaded environment from {}", path.display()),
        Err(e) => info!("no env file loaded: {e}"),
    }

    let mut config = Config::from_env();
    if let Some(file) = &args.file {
        config = config.merge(read_config_file(file)?);
    }

    if config.api_token.is_none() {
        warn!("CLOUDFLARE_API_TOKEN is not set, API calls will be rejected");
    }

    let bind_addr = config.bind_addr();
    let context = AppContext::from_config(config)?;

    if let Err(e) = context.discover_zones().await {
        let e = anyhow::Error::new(e);
        error!("zone discovery failed: {e:#}");
        return Err(e.context("zone discovery failed"));
    }

    let poller = PollerHandle::spawn(&context);

    if let Err(e) = spawn_metrics_server(bind_addr, context.metrics.clone()).await {
        error!("failed to start metrics server: {e:#}");
        return Err(e);
    }

    shutdown_signal().await;
    info!("shutting down");

    poller.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
