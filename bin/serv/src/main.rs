use aps_api::{
    config::ApiConfig,
    jobs::start_background_jobs,
    metrics::{init_metrics, metrics_handler},
    router,
    state::ApiState,
    tracing::init_tracing,
};
use axum::{Router, routing::get};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(&config.env)?;

    let pool = aps_db::create_pool(&config.database_url, config.db_max_connections).await?;
    aps_db::ensure_db_and_migrate(&config.database_url, &pool).await?;
    tracing::info!("Database ready");

    let metrics_handle = init_metrics()?;

    let state = ApiState::new(&config, pool)?;
    let jobs = start_background_jobs(state.sessions.clone(), config.session_idle_minutes);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);
    let app = router::app(state, config.allowed_origins.clone()).merge(metrics_routes);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, env = ?config.env, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for job in jobs {
        job.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
