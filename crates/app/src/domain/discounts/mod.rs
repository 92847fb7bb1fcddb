//! Discounts

pub mod data;
pub mod errors;
pub mod records;
pub mod redemption;
pub(crate) mod repository;
pub mod service;

pub use errors::DiscountsServiceError;
pub use service::*;
