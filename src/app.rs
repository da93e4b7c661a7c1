/*
 * Responsibility
 * - Config読み込み → 依存生成 (DB pool, schema, Superuser, TokenCodec, AccessGate) → Router 組み立て
 * - Middleware の適用 (access gate / security headers / CORS / HTTP)
 * - axum::serve() で起動, Ctrl-C で graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{
        self,
        auth::{AccessGate, ExemptionSet},
    },
    repos::{PgAccountRepo, bootstrap},
    services::auth::TokenCodec,
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG があればそれを優先
    // ex: RUST_LOG=info,account_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr が見えない起動方法でも panic を取りこぼさない
        tracing::error!(?info, "panic");

        // development: 即落として気付けるようにする
        // production: default hook に任せてサーバは生かす
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting account gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

async fn build_state(config: &Config) -> Result<AppState> {
    // DB: connect → table → Superuser の順。どこで失敗したかは AppError の kind で分かる
    let pool = bootstrap::connect(&config.database_url).await?;
    bootstrap::ensure_schema(&pool).await?;
    bootstrap::ensure_superuser(&pool, &config.superuser.email, &config.superuser.password)
        .await?;

    let tokens = TokenCodec::new(&config.auth.secret, config.auth.token_ttl_seconds);
    let gate = AccessGate::new(
        config.auth.header.clone(),
        ExemptionSet::new(config.auth.exempt_paths.iter().cloned()),
    );

    tracing::debug!(?tokens, ?gate, "auth configured");

    Ok(AppState::new(
        Arc::new(PgAccountRepo::new(pool)),
        tokens,
        gate,
    ))
}

/// API routes behind the access gate, state applied.
pub fn router(state: AppState) -> Router {
    let router = Router::new().nest("/api/v1", api::v1::routes());
    let router = middleware::auth::gate::apply(router, state.clone());
    router.with_state(state)
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = router(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
