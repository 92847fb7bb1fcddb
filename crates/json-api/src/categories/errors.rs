//! Category Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{database::is_retryable, domain::categories::CategoriesServiceError};

use crate::retry::unavailable;

pub(crate) fn into_status_error(error: CategoriesServiceError) -> StatusError {
    match error {
        CategoriesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Category slug already exists")
        }
        CategoriesServiceError::NotFound => StatusError::not_found().brief("Category not found"),
        CategoriesServiceError::Forbidden => StatusError::forbidden().brief("Admin role required"),
        CategoriesServiceError::MissingRequiredData | CategoriesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid category payload")
        }
        CategoriesServiceError::Sql(source) if is_retryable(&source) => {
            warn!("category storage temporarily unavailable: {source}");

            unavailable()
        }
        CategoriesServiceError::Sql(source) => {
            error!("category storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
