//! Discount Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Discount UUID
pub type DiscountUuid = TypedUuid<DiscountRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` currency units off the subtotal.
    Flat,

    /// `value` percent of the subtotal, `0..=100`.
    Percentage,
}

impl DiscountKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown discount kind: {0}")]
pub struct UnknownDiscountKind(String);

impl FromStr for DiscountKind {
    type Err = UnknownDiscountKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "percentage" => Ok(Self::Percentage),
            other => Err(UnknownDiscountKind(other.to_string())),
        }
    }
}

/// Discount Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountRecord {
    pub uuid: DiscountUuid,
    pub code: String,
    pub kind: DiscountKind,
    pub value: u64,
    pub expires_at: Timestamp,
    pub max_uses: u64,
    pub used_count: u64,
    pub created_at: Timestamp,
}
