//! API Server setup

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use robofleet_config::{Environment, ServerConfig};
use robofleet_core::RobotRegistry;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::ApiError;
use crate::routes::{create_router, create_router_with_static};
use crate::state::AppState;

/// ルーターにミドルウェアを組み付けたアプリケーションを構築する
pub fn build_app(config: &ServerConfig, registry: Arc<RobotRegistry>) -> Router {
    let environment = config.environment;
    let state = AppState::new(registry, environment);

    let mut router = match &config.static_dir {
        Some(dir) => create_router_with_static(state, dir),
        None => create_router(state),
    };

    // セキュリティヘッダー
    router = router
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    if config.cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        );
    }

    router
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send>| {
            panic_response(panic, environment)
        }))
        .layer(TraceLayer::new_for_http())
}

/// ハンドラ内の panic を 500 レスポンスに変換する
fn panic_response(panic: Box<dyn Any + Send>, environment: Environment) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::internal(message, environment).into_response()
}

/// Run the API server until Ctrl+C
pub async fn run_server(config: &ServerConfig, registry: Arc<RobotRegistry>) -> anyhow::Result<()> {
    let app = build_app(config, registry);
    let address = config.bind_address();

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("{} にバインドできません", address))?;

    info!(
        address = %listener.local_addr()?,
        environment = %config.environment,
        "RoboFleet API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP サーバーが異常終了しました")?;

    info!("RoboFleet API stopped");
    Ok(())
}

/// Start server in background (for testing)
///
/// port 0 を指定すると OS が割り当てたポートで待ち受ける。
pub async fn start_background_server(
    config: &ServerConfig,
    registry: Arc<RobotRegistry>,
) -> anyhow::Result<SocketAddr> {
    let app = build_app(config, registry);

    let listener = TcpListener::bind(config.bind_address()).await?;
    let actual_addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Server error");
        }
    });

    Ok(actual_addr)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
