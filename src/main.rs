use artswipe::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artswipe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = AppState::from_config(&config)?;

    tracing::info!(
        backend_url = %config.backend_url,
        provider = state.provider.name(),
        settle_delay_ms = config.settle_delay_ms,
        recommend_concurrency = state.recommend_concurrency,
        "Recommendation backend configured"
    );

    let _sweeper = state
        .sessions
        .spawn_sweeper(config.session_ttl(), config.session_sweep_interval());
    tracing::info!(
        session_ttl_secs = config.session_ttl_secs,
        "Idle swipe session sweeper started"
    );

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
