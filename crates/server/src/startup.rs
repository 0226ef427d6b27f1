use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::{
    repo::seaorm::SeaOrmAccountRepository,
    repository::AccountRepository,
    service::{AuthConfig, AuthService},
};

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Auth service configuration from the loaded settings. Secrets are moved in
/// here once; nothing reads them from the environment afterwards.
pub fn auth_config(cfg: &AppConfig) -> anyhow::Result<AuthConfig> {
    let ttl = i64::try_from(cfg.auth.token_ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| anyhow::anyhow!("auth.token_ttl_secs out of range"))?;
    Ok(AuthConfig {
        password_key: cfg.auth.password_key.clone(),
        jwt_secret: cfg.auth.jwt_secret.clone(),
        token_ttl: ttl,
    })
}

/// Router over any account repository; used by `run` and by tests.
pub fn build_app(repo: Arc<dyn AccountRepository>, auth: AuthConfig) -> Router {
    let state = ServerState { auth: Arc::new(AuthService::new(repo, auth)) };
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: build the app and run the HTTP server. The caller installs
/// the tracing subscriber.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate()?;
    let db = models::db::connect_url(&cfg.database.url).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let repo: Arc<dyn AccountRepository> = Arc::new(SeaOrmAccountRepository::new(db));
    let app = build_app(repo, auth_config(&cfg)?);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting account server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_carried_over() {
        let mut cfg = AppConfig::default();
        cfg.auth.password_key = "k".into();
        cfg.auth.jwt_secret = "s".into();
        cfg.auth.token_ttl_secs = 90;
        let auth = auth_config(&cfg).unwrap();
        assert_eq!(auth.token_ttl, chrono::Duration::seconds(90));
    }

    #[test]
    fn bind_addr_from_config() {
        let cfg = AppConfig::default();
        assert_eq!(bind_addr(&cfg).unwrap(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }
}
