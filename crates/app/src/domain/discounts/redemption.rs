//! Discount redemption rules.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::domain::discounts::records::{DiscountKind, DiscountRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedemptionError {
    #[error("percentage discounts cannot exceed 100%")]
    PercentageTooLarge,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed")]
    PercentConversion,
}

/// `percent`% of `amount`, rounded half away from zero.
pub fn percent_of(percent: u64, amount: u64) -> Result<u64, RedemptionError> {
    if percent > 100 {
        return Err(RedemptionError::PercentageTooLarge);
    }

    let ratio = Decimal::from_u64(percent)
        .ok_or(RedemptionError::PercentConversion)?
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or(RedemptionError::PercentConversion)?;

    let percent = Percentage::from(ratio);

    let amount = Decimal::from_u64(amount).ok_or(RedemptionError::PercentConversion)?;

    (percent * Decimal::ONE)
        .checked_mul(amount)
        .ok_or(RedemptionError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(RedemptionError::PercentConversion)
}

impl DiscountRecord {
    /// Redeemable strictly before expiry and while uses remain.
    #[must_use]
    pub fn is_redeemable(&self, now: Timestamp) -> bool {
        now < self.expires_at && self.used_count < self.max_uses
    }

    /// Amount taken off `subtotal`. Flat discounts are not capped at the subtotal;
    /// the order total saturates at zero instead.
    pub fn amount_off(&self, subtotal: u64) -> Result<u64, RedemptionError> {
        match self.kind {
            DiscountKind::Flat => Ok(self.value),
            DiscountKind::Percentage => percent_of(self.value, subtotal),
        }
    }
}
