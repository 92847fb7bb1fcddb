//! Storefront Domain Concerns

pub mod access;
pub mod carts;
pub mod categories;
pub mod discounts;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod users;
