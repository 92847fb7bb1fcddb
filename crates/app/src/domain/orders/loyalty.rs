//! Loyalty coin accrual.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How completed orders turn into coins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyPolicy {
    /// After `n` orders the balance is raised to `n / 2` if that is higher.
    #[default]
    Milestone,

    /// One coin is added every second order.
    Additive,
}

impl LoyaltyPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Additive => "additive",
        }
    }

    /// Balance after accrual, given the user's order count including the new
    /// order and their balance after any coins spent on it.
    #[must_use]
    pub fn settle(self, order_count: u64, balance: u64) -> u64 {
        match self {
            Self::Milestone => balance.max(order_count / 2),
            Self::Additive if order_count > 0 && order_count % 2 == 0 => {
                balance.saturating_add(1)
            }
            Self::Additive => balance,
        }
    }
}

impl fmt::Display for LoyaltyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown loyalty policy: {0} (expected milestone or additive)")]
pub struct UnknownLoyaltyPolicy(String);

impl FromStr for LoyaltyPolicy {
    type Err = UnknownLoyaltyPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "milestone" => Ok(Self::Milestone),
            "additive" => Ok(Self::Additive),
            _ => Err(UnknownLoyaltyPolicy(s.to_string())),
        }
    }
}
