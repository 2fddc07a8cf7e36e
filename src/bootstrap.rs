use crate::config::{Config, SessionBackend};
use crate::domain::ports::{AuthenticationBackend, SessionStore, TokenGenerator};
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::http::router::CALLBACK_PATH;
use crate::infrastructure::persistence::{MemorySessionStore, SqlSessionStore};
use crate::infrastructure::providers::{OpenIdConnectBackend, OsTokenGenerator};
use crate::shared::utils::absolute_url::absolutify;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

pub async fn build_app_state(config: &Config) -> anyhow::Result<AppState> {
    let session_store = build_session_store(config).await?;

    let provider = config.provider.as_ref().context(
        "OIDC_OP_ISSUER_URL and OIDC_RP_CLIENT_SECRET must be set to exchange authorization codes",
    )?;
    let redirect_uri = absolutify(&config.oidc.site_url, CALLBACK_PATH)?;
    let backend = OpenIdConnectBackend::discover(
        provider,
        &config.oidc.client_id,
        &redirect_uri,
        config.oidc.use_nonce,
    )
    .await?;
    tracing::info!("Identity provider metadata discovered from {}", provider.issuer_url);

    let tokens: Arc<dyn TokenGenerator> = Arc::new(OsTokenGenerator);
    let backend: Arc<dyn AuthenticationBackend> = Arc::new(backend);

    if config.authorization.is_some() {
        tracing::warn!(
            "Simplified authorization endpoints enabled: their callback performs no session-bound state check"
        );
    }

    Ok(AppState::new(config, session_store, backend, tokens))
}

async fn build_session_store(config: &Config) -> anyhow::Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::Memory => {
            tracing::info!("Using in-memory session store");
            Arc::new(MemorySessionStore::new())
        }
        SessionBackend::Sqlite => {
            let store = SqlSessionStore::connect(&config.session.database_url).await?;
            store.run_migrations().await?;
            tracing::info!("Session database ready");
            Arc::new(store)
        }
    };

    spawn_session_cleanup(store.clone(), config.session.duration_hours);
    Ok(store)
}

fn spawn_session_cleanup(store: Arc<dyn SessionStore>, duration_hours: i64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match store
                .cleanup_expired_sessions(time::Duration::hours(duration_hours))
                .await
            {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired session entries", removed),
                Err(e) => tracing::error!("Session cleanup failed: {}", e),
            }
        }
    });
}
