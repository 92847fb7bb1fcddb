//! Discount Data

use jiff::Timestamp;

use crate::domain::discounts::records::{DiscountKind, DiscountUuid};

/// New Discount Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiscount {
    pub uuid: DiscountUuid,
    pub code: String,
    pub kind: DiscountKind,
    pub value: u64,
    pub expires_at: Timestamp,
    pub max_uses: u64,
}
