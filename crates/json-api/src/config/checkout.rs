//! Checkout Config

use clap::Args;
use storefront_app::domain::orders::{
    loyalty::LoyaltyPolicy,
    settings::{CheckoutSettings, DEFAULT_COIN_VALUE, InvalidDiscountPolicy},
};

/// Checkout pricing and loyalty settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Currency units one loyalty coin is worth
    #[arg(long, env = "COIN_VALUE", default_value_t = DEFAULT_COIN_VALUE)]
    pub coin_value: u64,

    /// How coins are awarded after checkout (milestone, additive)
    #[arg(long, env = "LOYALTY_POLICY", default_value_t = LoyaltyPolicy::Milestone)]
    pub loyalty_policy: LoyaltyPolicy,

    /// What to do with unknown, expired or exhausted codes (ignore, reject)
    #[arg(long, env = "INVALID_DISCOUNT_POLICY", default_value_t = InvalidDiscountPolicy::Ignore)]
    pub invalid_discount_policy: InvalidDiscountPolicy,
}

impl CheckoutConfig {
    #[must_use]
    pub fn settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            coin_value: self.coin_value,
            loyalty: self.loyalty_policy,
            invalid_discount: self.invalid_discount_policy,
        }
    }
}
