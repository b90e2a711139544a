use mimalloc::MiMalloc;
use sqli_lab::config::Config;
use sqli_lab::db::{ConnectionProvider, bootstrap};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        seed_on_start = cfg.seed_on_start
    );
    warn!("this server is deliberately vulnerable to SQL injection; never expose it");

    let provider = ConnectionProvider::from_url(&cfg.database_url)?;
    bootstrap::ensure_data_dir(&provider);
    bootstrap::init_schema(&provider).await?;
    if cfg.seed_on_start {
        bootstrap::seed_if_empty(&provider).await?;
    }

    let state = sqli_lab::router::LabState::new(provider);
    let app = sqli_lab::router::lab_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}
