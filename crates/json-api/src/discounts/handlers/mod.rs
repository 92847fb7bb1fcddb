//! Discount Handlers

pub(crate) mod create;
