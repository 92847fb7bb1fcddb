//! Server configuration module

use clap::Parser;

use crate::config::{
    auth::AuthConfig,
    checkout::CheckoutConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod checkout;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Session settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Checkout pricing and loyalty settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use storefront_app::domain::orders::{loyalty::LoyaltyPolicy, settings::InvalidDiscountPolicy};
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 3] = [
        "storefront-json",
        "--database-url",
        "postgres://localhost/storefront",
    ];

    #[test]
    fn defaults_match_the_documented_behaviour() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.database.database_max_connections, 10);
        assert_eq!(config.auth.session_ttl_days, 30);
        assert_eq!(config.checkout.coin_value, 100);
        assert_eq!(config.checkout.loyalty_policy, LoyaltyPolicy::Milestone);
        assert_eq!(
            config.checkout.invalid_discount_policy,
            InvalidDiscountPolicy::Ignore
        );

        Ok(())
    }

    #[test]
    fn checkout_policies_parse_from_flags() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED.into_iter().chain([
                "--loyalty-policy",
                "additive",
                "--invalid-discount-policy",
                "reject",
                "--coin-value",
                "50",
            ]),
        )?;

        let settings = config.checkout.settings();

        assert_eq!(settings.loyalty, LoyaltyPolicy::Additive);
        assert_eq!(settings.invalid_discount, InvalidDiscountPolicy::Reject);
        assert_eq!(settings.coin_value, 50);

        Ok(())
    }

    #[test]
    fn unknown_policies_are_rejected() {
        let result = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--loyalty-policy", "generous"]),
        );

        assert!(result.is_err());
    }

    #[test]
    fn database_url_is_required() {
        assert!(ServerConfig::try_parse_from(["storefront-json"]).is_err());
    }
}
