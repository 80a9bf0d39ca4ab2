//! # Application State
//!
//! Shared state for the Axum application: the checkout orchestrator wired to
//! the configured billing provider, plus server configuration.

use billing_core::{BoxedBillingProvider, CheckoutOrchestrator, CheckoutPolicy};
use billing_stripe::StripeBillingProvider;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout orchestrator over the configured provider
    pub orchestrator: Arc<CheckoutOrchestrator>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create an AppState backed by the Stripe provider
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let policy = load_checkout_policy();

        let provider = StripeBillingProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(Arc::new(provider), policy, config))
    }

    /// Create an AppState with an explicit provider (used by tests)
    pub fn with_provider(
        provider: BoxedBillingProvider,
        policy: CheckoutPolicy,
        config: AppConfig,
    ) -> Self {
        Self {
            orchestrator: Arc::new(CheckoutOrchestrator::new(provider, policy)),
            config,
        }
    }
}

/// Load checkout defaults from config file
fn load_checkout_policy() -> CheckoutPolicy {
    let config_paths = [
        "config/checkout.toml",
        "../config/checkout.toml",
        "../../config/checkout.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            match toml::from_str::<CheckoutPolicy>(&content) {
                Ok(policy) => {
                    tracing::info!(
                        default_amount = policy.default_amount,
                        default_currency = %policy.default_currency,
                        "Loaded checkout policy from {}",
                        path
                    );
                    return policy;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path, e);
                }
            }
        }
    }

    tracing::warn!("No checkout policy found, using built-in defaults");
    CheckoutPolicy::default()
}
