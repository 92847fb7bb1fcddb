//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{discounts::redemption::RedemptionError, orders::pricing::PricingError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("requested {requested} coins but only {available} available")]
    InsufficientCoins { requested: u64, available: u64 },

    #[error("discount code is invalid, expired or used up")]
    DiscountInvalid,

    #[error("order amount overflowed")]
    AmountOverflow,

    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// Whether retrying the whole request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Sql(error) if crate::database::is_retryable(error))
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::AmountOverflow => Self::AmountOverflow,
        }
    }
}

impl From<RedemptionError> for OrdersServiceError {
    fn from(error: RedemptionError) -> Self {
        match error {
            RedemptionError::PercentageTooLarge => Self::DiscountInvalid,
            RedemptionError::PercentConversion => Self::AmountOverflow,
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
