//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, rate
//! limiting and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use jarvis_core::config::JarvisConfig;
use jarvis_core::error::JarvisError;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Browser origins allowed to call the API: the configured port and port+1
/// (frontend dev server), on both loopback names.
fn allowed_origins(port: u16) -> Vec<HeaderValue> {
    let dev_port = port.saturating_add(1);
    [port, dev_port]
        .into_iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect()
}

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(
            state.config.general.port,
        )))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let public_routes = Router::new().route("/health", get(handlers::health));

    let limiter = RateLimiter::from_config(&state.config.general);

    let api_routes = Router::new()
        .route("/api/chat/message", post(handlers::chat_message))
        // One microphone: listens are served one at a time.
        .route(
            "/api/voice-chat",
            post(handlers::voice_chat).layer(ConcurrencyLimitLayer::new(1)),
        )
        .route(
            "/api/chats",
            get(handlers::list_chats).delete(handlers::clear_chats),
        )
        .route(
            "/api/contacts",
            get(handlers::list_contacts).post(handlers::add_contact),
        )
        .route("/api/contacts/{index}", delete(handlers::delete_contact))
        .route("/api/tts/test", get(handlers::tts_test))
        .route("/api/classify", post(handlers::classify))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(limiter));

    public_routes
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB global limit
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
///
/// Binds to 127.0.0.1 (localhost only) on the port from config.
pub async fn start_server(config: &JarvisConfig, state: AppState) -> Result<(), JarvisError> {
    let addr = format!("127.0.0.1:{}", config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| JarvisError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| JarvisError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
