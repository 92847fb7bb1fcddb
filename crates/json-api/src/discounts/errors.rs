//! Discount Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{database::is_retryable, domain::discounts::DiscountsServiceError};

use crate::retry::unavailable;

pub(crate) fn into_status_error(error: DiscountsServiceError) -> StatusError {
    match error {
        DiscountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Discount code already exists")
        }
        DiscountsServiceError::NotFound => StatusError::not_found().brief("Discount not found"),
        DiscountsServiceError::Forbidden => StatusError::forbidden().brief("Admin role required"),
        DiscountsServiceError::MissingRequiredData | DiscountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid discount payload")
        }
        DiscountsServiceError::Sql(source) if is_retryable(&source) => {
            warn!("discount storage temporarily unavailable: {source}");

            unavailable()
        }
        DiscountsServiceError::Sql(source) => {
            error!("discount storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
