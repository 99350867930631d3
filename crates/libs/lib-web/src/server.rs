//! # Server Setup
//!
//! Tracing initialization, configuration loading, route registration, and HTTP
//! server startup.

// region: --- Imports
use crate::handlers;
use crate::middleware::{log_requests, require_whitelisted, stamp_req, RequestStamp};
use crate::services::KeystoreService;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use lib_core::{Config, ManagerMode};
use lib_hotel::{HotelManagerFactory, InMemoryLedger, RpcHotelManagerFactory};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hotels: Arc<dyn HotelManagerFactory>,
}

impl AppState {
    pub fn new(config: Config, hotels: Arc<dyn HotelManagerFactory>) -> Self {
        Self { config, hotels }
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
// endregion: --- AppState

// region: --- Server Setup
/// Load configuration from the environment, then serve until the process is stopped.
///
/// `.env` must already be loaded by the caller.
///
/// # Errors
///
/// This function will return an error if:
/// - The tracing subscriber cannot be installed
/// - Configuration is missing or invalid
/// - The hotel client cannot be created
/// - Server binding fails
pub async fn start_server() -> anyhow::Result<()> {
    let log_level = init_tracing()?;

    info!(" HOTEL API STARTING");
    info!(" Log level: {}", log_level);

    info!("Loading configuration...");
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!(" Index address: {}", config.index_address);
    info!(" Keystore: {}", config.keystore_path.display());
    info!(" Client timeout: {}s", config.sdk_timeout.as_secs());
    if !config.keystore_path.exists() {
        warn!(
            "Keystore {} does not exist yet; mutating requests fail until one is uploaded to POST /wallet",
            config.keystore_path.display()
        );
    }

    let hotels: Arc<dyn HotelManagerFactory> = match config.manager_mode {
        ManagerMode::Rpc => {
            info!(" Hotel manager bridge: {}", config.rpc_url);
            Arc::new(RpcHotelManagerFactory::new(config.rpc_url.clone())?)
        }
        ManagerMode::Memory => {
            info!(" MEMORY MODE - hotels live in this process only");
            Arc::new(memory_ledger(&config))
        }
    };

    let bind_address = config.bind_address.clone();
    let app = create_router(AppState::new(config, hotels));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!(" SERVER READY: http://{}", bind_address);
    log_server_info();

    // ConnectInfo is required by the whitelist middleware
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

/// Ledger for memory mode, with `MEMORY_HOTELS` registered and managed by the
/// address the configured keystore declares.
pub fn memory_ledger(config: &Config) -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    if config.memory_hotels.is_empty() {
        warn!("MEMORY_HOTELS is empty; every hotel route answers 502 until hotels are registered");
        return ledger;
    }

    let Some(manager) = KeystoreService::new(config.keystore_path.clone()).declared_address() else {
        warn!(
            "Keystore {} declares no readable address; MEMORY_HOTELS not registered",
            config.keystore_path.display()
        );
        return ledger;
    };

    for hotel in &config.memory_hotels {
        ledger.register_hotel(*hotel, manager, format!("Hotel {}", hotel), "Development hotel");
    }
    info!(" Memory hotels: {} managed by {}", config.memory_hotels.len(), manager);
    ledger
}

/// Install the global subscriber filtered by `LOG_LEVEL`; returns the level used.
fn init_tracing() -> anyhow::Result<String> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => tracing_subscriber::EnvFilter::new(&log_level),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(log_level)
}

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let whitelist: Arc<[IpAddr]> = Arc::from(state.config.whitelist.clone());

    info!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .route(
            "/hotels/{hotelAddress}/unitTypes",
            get(handlers::unit_types::list_unit_types).post(handlers::unit_types::add_unit_type),
        )
        .route(
            "/hotels/{hotelAddress}/unitTypes/{unitType}",
            delete(handlers::unit_types::remove_unit_type).put(handlers::unit_types::edit_unit_type),
        )
        .route(
            "/hotels/{hotelAddress}/unitTypes/{unitType}/images",
            post(handlers::unit_types::add_image),
        )
        .route(
            "/hotels/{hotelAddress}/unitTypes/{unitType}/images/{id}",
            delete(handlers::unit_types::remove_image),
        )
        .route(
            "/hotels/{hotelAddress}/unitTypes/{unitType}/amenities",
            post(handlers::unit_types::add_amenity),
        )
        .route(
            "/hotels/{hotelAddress}/unitTypes/{unitType}/amenities/{amenity}",
            delete(handlers::unit_types::remove_amenity),
        )
        .route("/wallet", post(handlers::wallet::upload_wallet))
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (axum::http::StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        // Outermost last: requests pass cors, stamp, trace, logging, whitelist
        .layer(axum::middleware::from_fn_with_state(whitelist, require_whitelisted))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}

/// Log the served endpoints
fn log_server_info() {
    info!(" UNIT TYPES:");
    info!("   • GET    /hotels/{{hotelAddress}}/unitTypes");
    info!("   • POST   /hotels/{{hotelAddress}}/unitTypes");
    info!("   • PUT    /hotels/{{hotelAddress}}/unitTypes/{{unitType}}");
    info!("   • DELETE /hotels/{{hotelAddress}}/unitTypes/{{unitType}}");
    info!("   • POST   /hotels/{{hotelAddress}}/unitTypes/{{unitType}}/images");
    info!("   • DELETE /hotels/{{hotelAddress}}/unitTypes/{{unitType}}/images/{{id}}");
    info!("   • POST   /hotels/{{hotelAddress}}/unitTypes/{{unitType}}/amenities");
    info!("   • DELETE /hotels/{{hotelAddress}}/unitTypes/{{unitType}}/amenities/{{amenity}}");
    info!(" WALLET:");
    info!("   • POST   /wallet");
    info!(" HEALTH:");
    info!("   • GET    /health");
}
// endregion: --- Server Setup

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::unit_types::tests::{
        send, setup, temp_keystore_path, test_config, write_keystore, PASSWORD,
    };
    use axum::http::StatusCode;
    use lib_auth::Account;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_ledger_seeds_configured_hotels() {
        // Arrange
        let manager = Account::generate();
        let keystore_path = temp_keystore_path();
        write_keystore(&keystore_path, &manager, PASSWORD);
        let hotel: lib_core::Address = "0x00000000000000000000000000000000000000bb".parse().unwrap();
        let config = Config {
            memory_hotels: vec![hotel],
            ..test_config(keystore_path.clone())
        };

        // Act
        let ledger = memory_ledger(&config);
        let app = create_router(AppState::new(config, Arc::new(ledger.clone())));
        let (listed, body) = send(&app, "GET", &format!("/hotels/{}/unitTypes", hotel), None).await;
        let (added, _) = send(
            &app,
            "POST",
            &format!("/hotels/{}/unitTypes", hotel),
            Some(json!({ "password": PASSWORD, "unitType": "BASIC" })),
        )
        .await;

        // Assert
        assert_eq!(ledger.hotel(&hotel).unwrap().manager, manager.address());
        assert_eq!(listed, StatusCode::OK);
        assert_eq!(body, json!({ "unitTypes": {} }));
        assert_eq!(added, StatusCode::OK);
        let _ = std::fs::remove_file(&keystore_path);
    }

    #[test]
    fn test_memory_ledger_without_keystore_registers_nothing() {
        let hotel: lib_core::Address = "0x00000000000000000000000000000000000000bb".parse().unwrap();
        let config = Config {
            memory_hotels: vec![hotel],
            ..test_config(temp_keystore_path())
        };

        let ledger = memory_ledger(&config);

        assert!(ledger.hotel(&hotel).is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let ctx = setup();
        let (status, body) = send(&ctx.app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("OK"));
    }

    #[tokio::test]
    async fn test_unsupported_method_is_rejected() {
        let ctx = setup();
        let (status, _) = send(
            &ctx.app,
            "PATCH",
            "/hotels/0x00000000000000000000000000000000000000aa/unitTypes",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
