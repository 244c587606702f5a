//! HTTP 传输层
//!
//! 单一路由，接受任意方法，原样读取请求体交给 [`DeriveService`]。
//! 派生在阻塞线程池中执行，并由信号量限制同时进行的派生数量，
//! 因为每个派生都要占用配置的 Argon2 内存。
//!
//! ## 示例
//!
//! ```rust,no_run
//! use sized_kdf::config::ServiceConfig;
//! use sized_kdf::server::{DEFAULT_ROUTE, router, serve};
//! use sized_kdf::service::DeriveService;
//!
//! # async fn run() -> std::io::Result<()> {
//! let service = DeriveService::new(ServiceConfig::default()).unwrap();
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! serve(listener, router(service, DEFAULT_ROUTE)).await
//! # }
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::error::Error;
use crate::kdf::KeyDerivation;
use crate::service::{DeriveService, Reply};

/// 默认路由
pub const DEFAULT_ROUTE: &str = "/api";

/// 路由共享状态
struct AppState<K> {
    service: Arc<DeriveService<K>>,
    permits: Arc<Semaphore>,
}

impl<K> Clone for AppState<K> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            permits: Arc::clone(&self.permits),
        }
    }
}

/// 构建路由
pub fn router<K>(service: DeriveService<K>, route: &str) -> Router
where
    K: KeyDerivation + 'static,
{
    let permits = Arc::new(Semaphore::new(
        service.config().max_concurrent_derivations,
    ));
    let state = AppState {
        service: Arc::new(service),
        permits,
    };

    Router::new()
        .route(route, any(derive_handler::<K>))
        .with_state(state)
}

async fn derive_handler<K>(
    State(state): State<AppState<K>>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    K: KeyDerivation + 'static,
{
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            return to_response(Reply::from_error(&Error::malformed(rejection.body_text())));
        }
    };

    let permit = match Arc::clone(&state.permits).acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!(error = %e, "derivation semaphore closed");
            return to_response(Reply::from_error(&Error::internal(e.to_string())));
        }
    };

    let service = Arc::clone(&state.service);
    let reply = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        service.handle(&body)
    })
    .await
    .unwrap_or_else(|e| {
        error!(error = %e, "derivation task panicked");
        Reply::from_error(&Error::internal(e.to_string()))
    });

    info!(status = reply.status, "handled derivation request");
    to_response(reply)
}

fn to_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// 在监听器上运行服务，收到 Ctrl-C 后优雅退出
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}
