use anyhow::Context;
use fiet::{
    api::routes::create_router,
    cli::Cli,
    db::connect_with_retry,
    utils::config::{load_env_file, Config, LogFormat, ServerConfig},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let env_loaded = load_env_file(&cli.env_file);

    let mut config = Config::from_env().context("failed to load configuration")?;
    cli.apply(&mut config);

    init_tracing(&config.server)?;

    if !env_loaded {
        tracing::warn!(path = %cli.env_file.display(), "env file not loaded");
    }

    if config.auth.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is empty; tokens will be signed with a zero-length key");
    }

    let db = connect_with_retry(
        &config.database.provider,
        config.database.connect_retries,
        config.database.retry_delay,
    )
    .await
    .context("failed to connect to database")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config, Arc::new(db)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, "fiet-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .context("invalid log level")?;

    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
    .context("failed to install tracing subscriber")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
