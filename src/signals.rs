use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::config::Config;

#[derive(Debug, Clone, Copy)]
pub enum ShutdownSignal {
    /// Drain connections and exit
    Graceful,
}

/// Setup signal handlers for the server
///
/// SIGTERM/SIGINT broadcast a graceful shutdown. SIGHUP reloads `config_path`; a config
/// that fails to load or validate leaves the running one in place.
#[cfg(unix)]
pub fn setup_signal_handlers(
    config: Arc<ArcSwap<Config>>,
    config_path: PathBuf,
) -> (
    broadcast::Sender<ShutdownSignal>,
    tokio::task::JoinHandle<()>,
) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        let (mut sigterm, mut sigint, mut sighup) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        ) {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                }
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading configuration");
                    match reload_config(&config, &config_path) {
                        Ok(()) => info!("Configuration reloaded successfully"),
                        Err(e) => error!("Failed to reload configuration: {}", e),
                    }
                }
            }
        }
    });

    (shutdown_tx, handle)
}

/// Only Ctrl+C is available off unix
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config: Arc<ArcSwap<Config>>,
    _config_path: PathBuf,
) -> (
    broadcast::Sender<ShutdownSignal>,
    tokio::task::JoinHandle<()>,
) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(ShutdownSignal::Graceful);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    (shutdown_tx, handle)
}

/// Load, validate and atomically swap in a new configuration
///
/// Listener address, credit store and share store are fixed at startup; the reload affects
/// remote integrations, pricing of checkout sessions and identity settings.
pub fn reload_config(config: &ArcSwap<Config>, config_path: &Path) -> Result<()> {
    let new_config = crate::config::load_config(config_path)?;

    let current = config.load();
    if new_config.server.host != current.server.host || new_config.server.port != current.server.port {
        info!("Listener address changes take effect after a restart");
    }

    info!(
        generation = new_config.generation.enabled,
        payments = new_config.stripe.enabled,
        accounts = new_config.auth.enabled,
        "New configuration loaded"
    );

    config.store(Arc::new(new_config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[tokio::test]
    async fn test_setup_signal_handlers() {
        let config = Arc::new(ArcSwap::from_pointee(test_config()));
        let (shutdown_tx, _handle) = setup_signal_handlers(config, PathBuf::from("config.toml"));

        let mut rx = shutdown_tx.subscribe();
        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, ShutdownSignal::Graceful));
    }

    #[test]
    fn test_failed_reload_keeps_current_config() {
        let config = ArcSwap::from_pointee(test_config());
        let result = reload_config(&config, Path::new("/nonexistent/studio.toml"));
        assert!(result.is_err());
        assert_eq!(config.load().stripe.price_cents, 499);
    }

    #[test]
    fn test_reload_swaps_config() {
        let dir = std::env::temp_dir().join(format!("studio-reload-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut updated = test_config();
        updated.stripe.price_cents = 999;
        std::fs::write(&path, toml::to_string(&updated).unwrap()).unwrap();

        let config = ArcSwap::from_pointee(test_config());
        reload_config(&config, &path).unwrap();
        assert_eq!(config.load().stripe.price_cents, 999);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
