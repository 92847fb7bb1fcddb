//! Orders

pub mod data;
pub mod errors;
pub mod loyalty;
pub mod pricing;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod settings;

pub use errors::OrdersServiceError;
pub use service::*;
