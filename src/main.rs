use oidc_rp::bootstrap;
use oidc_rp::config::Config;
use oidc_rp::infrastructure::http::router::build_router;
use oidc_rp::infrastructure::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing required settings stop startup here, before any request is served
    let config = Config::from_env()?;

    let _guard = observability::init(&config).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!("Configuration loaded");

    let state = bootstrap::build_app_state(&config).await?;
    let app = build_router(state);

    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
