pub mod auth;
pub mod config;
pub mod credits;
pub mod design;
pub mod error;
pub mod error_category;
pub mod estimate;
pub mod handlers;
pub mod i18n;
pub mod image_utils;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod server;
pub mod share;
pub mod signals;
pub mod state;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` overrides `level`. `format` is one of `json`, `pretty` or `compact`.
/// Can only be called once per process.
pub fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "json" => registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .init(),
        "compact" => registry.with(fmt::layer().compact().with_target(true)).init(),
        _ => registry.with(fmt::layer().with_target(true)).init(),
    }
}
