//! Categories

mod errors;
mod handlers;

pub(crate) use errors::*;
pub(crate) use handlers::*;
