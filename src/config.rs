use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub credits: CreditsConfig,
    #[serde(default)]
    pub share: ShareConfig,
    pub generation: GenerationConfig,
    pub stripe: StripeConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreditsConfig {
    /// Free credits granted to an owner on first contact
    pub initial_credits: u32,
    /// Lifetime of a cached balance
    pub cache_ttl_hours: u64,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            initial_credits: 3,
            cache_ttl_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
    pub id_length: usize,
    pub max_attempts: u32,
    /// Snapshots older than this are dropped by the cleanup task
    #[serde(default = "default_share_retention_days")]
    pub retention_days: i64,
    /// Upper bound on stored snapshots; creation fails once it is reached
    #[serde(default = "default_max_shared_designs")]
    pub max_designs: usize,
}

fn default_share_retention_days() -> i64 {
    90
}

fn default_max_shared_designs() -> usize {
    100_000
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            id_length: 8,
            max_attempts: 5,
            retention_days: default_share_retention_days(),
            max_designs: default_max_shared_designs(),
        }
    }
}

/// OpenAI-compatible image generation gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub enabled: bool,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeConfig {
    pub enabled: bool,
    pub secret_key: String,
    pub webhook_secret: String,
    pub base_url: String,
    /// Flat price of one credit pack in the smallest currency unit
    pub price_cents: u64,
    pub currency: String,
    pub product_name: String,
    pub credits_per_purchase: u32,
    pub success_url: String,
    pub cancel_url: String,
    pub webhook_tolerance_seconds: i64,
    pub timeout_seconds: u64,
}

/// Session store used to resolve bearer tokens to user ids
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub enabled: bool,
    pub base_url: String,
    pub anon_key: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

/// Load configuration from `path` layered with `STUDIO__SECTION__KEY` environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("STUDIO").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if !matches!(cfg.server.log_format.as_str(), "json" | "pretty" | "compact") {
        anyhow::bail!(
            "Invalid log_format '{}': expected json, pretty or compact",
            cfg.server.log_format
        );
    }

    if cfg.share.id_length < 4 {
        anyhow::bail!("share.id_length must be at least 4");
    }
    if cfg.share.max_attempts == 0 {
        anyhow::bail!("share.max_attempts must be at least 1");
    }
    if !(1..=36_500).contains(&cfg.share.retention_days) {
        anyhow::bail!("share.retention_days must be between 1 and 36500");
    }
    if cfg.share.max_designs == 0 {
        anyhow::bail!("share.max_designs must be at least 1");
    }

    if cfg.credits.cache_ttl_hours == 0 {
        anyhow::bail!("credits.cache_ttl_hours must be at least 1");
    }

    if cfg.generation.enabled {
        if cfg.generation.api_key.is_empty() {
            anyhow::bail!("Generation is enabled but generation.api_key is empty");
        }
        if cfg.generation.model.is_empty() {
            anyhow::bail!("Generation is enabled but generation.model is empty");
        }
    }

    if cfg.stripe.enabled {
        if cfg.stripe.secret_key.is_empty() {
            anyhow::bail!("Stripe is enabled but stripe.secret_key is empty");
        }
        if cfg.stripe.webhook_secret.is_empty() {
            anyhow::bail!("Stripe is enabled but stripe.webhook_secret is empty");
        }
        if cfg.stripe.price_cents == 0 {
            anyhow::bail!("stripe.price_cents must be greater than zero");
        }
        if cfg.stripe.credits_per_purchase == 0 {
            anyhow::bail!("stripe.credits_per_purchase must be greater than zero");
        }
    }

    if cfg.auth.enabled && cfg.auth.base_url.is_empty() {
        anyhow::bail!("Auth is enabled but auth.base_url is empty");
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            cors_origins: vec![],
        },
        credits: CreditsConfig::default(),
        share: ShareConfig::default(),
        generation: GenerationConfig {
            enabled: true,
            api_key: "sk-gen-test-key".to_string(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
            model: "image-preview".to_string(),
            timeout_seconds: 30,
        },
        stripe: StripeConfig {
            enabled: true,
            secret_key: "sk_test_123456789".to_string(),
            webhook_secret: "whsec_test".to_string(),
            base_url: "http://127.0.0.1:9/v1".to_string(),
            price_cents: 499,
            currency: "eur".to_string(),
            product_name: "10 design credits".to_string(),
            credits_per_purchase: 10,
            success_url: "https://studio.example/success".to_string(),
            cancel_url: "https://studio.example/cancel".to_string(),
            webhook_tolerance_seconds: 300,
            timeout_seconds: 30,
        },
        auth: AuthConfig {
            enabled: false,
            base_url: String::new(),
            anon_key: String::new(),
            timeout_seconds: 10,
        },
        metrics: MetricsConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&test_config()).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_log_format() {
        let mut cfg = test_config();
        cfg.server.log_format = "xml".to_string();
        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("Invalid log_format"));
    }

    #[test]
    fn test_validate_config_requires_generation_key() {
        let mut cfg = test_config();
        cfg.generation.api_key.clear();
        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("generation.api_key"));
    }

    #[test]
    fn test_disabled_stripe_skips_secret_checks() {
        let mut cfg = test_config();
        cfg.stripe.enabled = false;
        cfg.stripe.secret_key.clear();
        cfg.stripe.webhook_secret.clear();
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_validate_share_limits() {
        let mut cfg = test_config();
        cfg.share.max_attempts = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = test_config();
        cfg.share.retention_days = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = test_config();
        cfg.share.max_designs = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_share_limits_default_when_omitted() {
        let share: ShareConfig = toml::from_str("id_length = 10\nmax_attempts = 3").unwrap();
        assert_eq!(share.retention_days, 90);
        assert_eq!(share.max_designs, 100_000);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("studio-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let toml = toml::to_string(&test_config()).unwrap();
        std::fs::write(&path, toml).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.share.max_attempts, 5);
        assert_eq!(cfg.stripe.credits_per_purchase, 10);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
