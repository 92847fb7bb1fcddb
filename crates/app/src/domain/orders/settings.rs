//! Checkout settings.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::orders::loyalty::LoyaltyPolicy;

/// Currency units one loyalty coin is worth unless configured otherwise.
pub const DEFAULT_COIN_VALUE: u64 = 100;

/// What checkout does with a discount code that is unknown, expired or used up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDiscountPolicy {
    /// Place the order without a discount.
    #[default]
    Ignore,

    /// Fail the checkout.
    Reject,
}

impl InvalidDiscountPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for InvalidDiscountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown invalid-discount policy: {0} (expected ignore or reject)")]
pub struct UnknownInvalidDiscountPolicy(String);

impl FromStr for InvalidDiscountPolicy {
    type Err = UnknownInvalidDiscountPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            _ => Err(UnknownInvalidDiscountPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub coin_value: u64,
    pub loyalty: LoyaltyPolicy,
    pub invalid_discount: InvalidDiscountPolicy,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            coin_value: DEFAULT_COIN_VALUE,
            loyalty: LoyaltyPolicy::default(),
            invalid_discount: InvalidDiscountPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_storefront_behaviour() {
        let settings = CheckoutSettings::default();

        assert_eq!(settings.coin_value, 100);
        assert_eq!(settings.loyalty, LoyaltyPolicy::Milestone);
        assert_eq!(settings.invalid_discount, InvalidDiscountPolicy::Ignore);
    }

    #[test]
    fn invalid_discount_policy_parses() {
        assert_eq!(
            "REJECT".parse::<InvalidDiscountPolicy>().ok(),
            Some(InvalidDiscountPolicy::Reject)
        );
        assert!("warn".parse::<InvalidDiscountPolicy>().is_err());
    }
}
