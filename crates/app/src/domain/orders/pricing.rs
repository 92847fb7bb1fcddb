//! Order pricing.
//!
//! All arithmetic is checked; an order whose amounts do not fit in `u64` is
//! rejected rather than wrapped.

use thiserror::Error;

use crate::domain::orders::records::OrderItemRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("order amount overflowed")]
    AmountOverflow,
}

/// Computed money fields of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub discount_amount: u64,
    pub coins_used: u64,
    pub total: u64,
}

/// `Σ price × quantity` over the line snapshots.
pub fn subtotal(lines: &[OrderItemRecord]) -> Result<u64, PricingError> {
    lines.iter().try_fold(0_u64, |sum, line| {
        line.price
            .checked_mul(u64::from(line.quantity))
            .and_then(|line_total| sum.checked_add(line_total))
            .ok_or(PricingError::AmountOverflow)
    })
}

impl OrderTotals {
    /// `total = max(0, subtotal - discount_amount - coins_used × coin_value)`.
    pub fn compute(
        subtotal: u64,
        discount_amount: u64,
        coins_used: u64,
        coin_value: u64,
    ) -> Result<Self, PricingError> {
        let coins_amount = coins_used
            .checked_mul(coin_value)
            .ok_or(PricingError::AmountOverflow)?;

        let total = subtotal
            .saturating_sub(discount_amount)
            .saturating_sub(coins_amount);

        Ok(Self {
            subtotal,
            discount_amount,
            coins_used,
            total,
        })
    }
}
