//! Storefront domain services, persistence and authentication.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod uuids;

#[cfg(all(test, feature = "integration"))]
mod test;
