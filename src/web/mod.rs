mod error;
mod extractors;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::services::auth;
use crate::{Config, Database};
use anyhow::Result;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const LOGIN_PAGE: &str = "/admin/login";
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(3600);

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let state = Arc::new(AppState::new(config, db)?);
    tracing::info!(
        "Content store: {} (mock fallback {})",
        state.store.name(),
        if state.config.store.fallback_to_mock {
            "on"
        } else {
            "off"
        }
    );

    let housekeeping = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HOUSEKEEPING_INTERVAL);
        loop {
            interval.tick().await;
            match auth::cleanup_expired_sessions(&housekeeping.db) {
                Ok(0) => {}
                Ok(n) => tracing::debug!("Removed {} expired sessions", n),
                Err(e) => tracing::error!("Session cleanup failed: {}", e),
            }
            housekeeping.login_limiter.cleanup();
            housekeeping.contact_limiter.cleanup();
            let evicted = housekeeping.evict_stale();
            if evicted > 0 {
                tracing::debug!(
                    "Evicted {} stale cache entries, {} remain",
                    evicted,
                    housekeeping.cached_entries()
                );
            }
        }
    });

    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    let app = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// The full application: API routes, the admin gate, the static bundle and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let server = state.config.server.clone();

    let mut app = Router::new()
        .merge(routes::public_routes())
        .merge(routes::auth_routes())
        .merge(routes::admin_routes());

    app = match server.static_dir.as_deref() {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => app.fallback(not_found),
    };

    app.layer(middleware::from_fn_with_state(state.clone(), admin_gate))
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(cors_layer(&server.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs.max(1)),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) if v != "*" => Some(v),
            _ => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource")
}

fn is_gated(path: &str) -> bool {
    (path == "/admin" || path.starts_with("/admin/")) && path != LOGIN_PAGE
}

/// Browser navigation to the admin UI needs a session; otherwise redirect to login.
async fn admin_gate(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !is_gated(path) {
        return next.run(request).await;
    }

    let signed_in = match extractors::session_token(request.headers()) {
        Some(token) => match auth::validate_session(&state.db, &token) {
            Ok(user) => user.is_some(),
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                false
            }
        },
        None => false,
    };
    if signed_in {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);
    let next_param: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    Redirect::to(&format!("{}?next={}", LOGIN_PAGE, next_param)).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
