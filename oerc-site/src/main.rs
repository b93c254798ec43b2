//! oerc-site: back end for the OERC research website
//!
//! Serves the research library, admin dashboard, assistant chat and content
//! pages as a JSON API. Runs in degraded mode (demo data, no writes) when no
//! backend is configured.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use oerc_common::config::{CliOverrides, SiteConfig};
use oerc_site::services::{connect, OfflineRepository, PaperRepository};
use oerc_site::{build_router, AppState};
use tracing::{error, info, warn};

/// How often idle visitors are swept
const PRUNE_INTERVAL_SECS: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "oerc-site", version, about = "OERC research website back end")]
struct Args {
    /// Listen address (host:port)
    #[arg(long)]
    bind: Option<String>,

    /// Path to TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hosted backend base URL
    #[arg(long)]
    supabase_url: Option<String>,

    /// Hosted backend anonymous API key
    #[arg(long)]
    supabase_anon_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting OERC site (oerc-site) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = SiteConfig::resolve(&CliOverrides {
        config_path: args.config,
        bind: args.bind,
        supabase_url: args.supabase_url,
        supabase_anon_key: args.supabase_anon_key,
    })?;

    let repository: Arc<dyn PaperRepository> = match connect(&config.backend) {
        Ok(repository) => repository,
        Err(e) => {
            error!("Invalid backend configuration: {}", e);
            Arc::new(OfflineRepository)
        }
    };
    if !config.backend.is_configured() {
        warn!("Backend URL or key missing; running in degraded mode (demo data, no writes)");
    }

    let state = AppState::new(repository, config.latency);
    state.load_papers().await;

    let visitors = Arc::clone(&state.visitors);
    let max_idle = config.visitor_idle;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(PRUNE_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            visitors.prune_idle(max_idle).await;
        }
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("oerc-site listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
