//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{database::is_retryable, domain::carts::CartsServiceError};

use crate::retry::unavailable;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        CartsServiceError::InsufficientStock {
            requested,
            available,
        } => StatusError::unprocessable_entity().brief(format!(
            "Only {available} in stock, {requested} requested"
        )),
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) if is_retryable(&source) => {
            warn!("cart storage temporarily unavailable: {source}");

            unavailable()
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
