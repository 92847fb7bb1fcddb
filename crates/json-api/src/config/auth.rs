//! Auth Config

use clap::Args;
use storefront_app::auth::{AuthSettings, DEFAULT_SESSION_TTL_DAYS};

/// Session settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Days a session token stays valid after login
    #[arg(long, env = "SESSION_TTL_DAYS", default_value_t = DEFAULT_SESSION_TTL_DAYS)]
    pub session_ttl_days: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn settings(&self) -> AuthSettings {
        AuthSettings::with_ttl_days(self.session_ttl_days)
    }
}
