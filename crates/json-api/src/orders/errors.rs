//! Order Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{database::is_retryable, domain::orders::OrdersServiceError};

use crate::retry::unavailable;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => {
            StatusError::unprocessable_entity().brief("Cart is empty")
        }
        OrdersServiceError::InsufficientCoins {
            requested,
            available,
        } => StatusError::unprocessable_entity().brief(format!(
            "Requested {requested} coins but only {available} available"
        )),
        OrdersServiceError::DiscountInvalid => StatusError::unprocessable_entity()
            .brief("Discount code is invalid, expired or used up"),
        OrdersServiceError::AmountOverflow => {
            StatusError::unprocessable_entity().brief("Order amount out of range")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) if is_retryable(&source) => {
            warn!("order storage temporarily unavailable: {source}");

            unavailable()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
