use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

use crate::{
    auth,
    config::Config,
    error, handlers, metrics,
    signals::setup_signal_handlers,
    state::AppState,
};

/// Room photos arrive base64-encoded inside JSON, so the limit sits above the decoded image cap
const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

/// Start the studio server
///
/// Installs the metrics recorder, wires SIGTERM/SIGINT to graceful shutdown and SIGHUP to a
/// reload of `config_path`, then serves until shutdown.
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));

    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone(), config_path);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState::from_shared(config_swap);
    tokio::spawn(cleanup_loop(state.clone()));
    let app = create_router(state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting interior studio on {}", addr);
    info!(
        generation = config.generation.enabled,
        payments = config.stripe.enabled,
        accounts = config.auth.enabled,
        initial_credits = config.credits.initial_credits,
        "Integrations configured"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Build the router with all routes and middleware
///
/// `metrics_handle` is `None` when metrics are disabled; the metrics route is then absent.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<PrometheusHandle>>) -> Router {
    let cors = cors_layer(&state.config.load());
    let metrics_endpoint = state.config.load().metrics.endpoint.clone();

    // Routes that spend or buy credits need to know who is calling
    let identified_routes = Router::new()
        .route("/api/credits", get(handlers::credits::get_credits))
        .route("/api/credits/use", post(handlers::credits::use_credit))
        .route("/api/checkout", post(handlers::checkout::create_checkout))
        .route("/api/generate", post(handlers::generate::handle_generate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::identity_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/estimate", post(handlers::estimate::handle_estimate))
        .route("/api/stripe/webhook", post(handlers::webhook::handle_webhook))
        .route("/api/share", post(handlers::share::create_share))
        .route("/api/share/:id", get(handlers::share::get_share));

    let mut app = public_routes.merge(identified_routes).with_state(state);

    if let Some(handle) = metrics_handle {
        app = app.merge(
            Router::new()
                .route(&metrics_endpoint, get(handlers::metrics_handler::metrics))
                .with_state(handle),
        );
    }

    app.layer(middleware::from_fn(error::localize_errors))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Stripe redelivers failed events for up to three days
const EVENT_RETENTION_DAYS: i64 = 7;
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

async fn cleanup_loop(state: AppState) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
    interval.tick().await;
    loop {
        interval.tick().await;
        let share_retention = state.config.load().share.retention_days;
        let purged = state.purge_stale(
            chrono::Duration::days(EVENT_RETENTION_DAYS),
            chrono::Duration::days(share_retention),
        );
        if purged.total() > 0 {
            debug!(
                cache_entries = purged.cache_entries,
                event_ids = purged.event_ids,
                shared_designs = purged.shared_designs,
                "Purged stale state"
            );
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.server.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
