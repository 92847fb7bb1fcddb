//! Notification Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{database::is_retryable, domain::notifications::NotificationsServiceError};

use crate::retry::unavailable;

pub(crate) fn into_status_error(error: NotificationsServiceError) -> StatusError {
    match error {
        NotificationsServiceError::NotFound => {
            StatusError::not_found().brief("Notification not found")
        }
        NotificationsServiceError::InvalidReference | NotificationsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid notification")
        }
        NotificationsServiceError::Sql(source) if is_retryable(&source) => {
            warn!("notification storage temporarily unavailable: {source}");

            unavailable()
        }
        NotificationsServiceError::Sql(source) => {
            error!("notification storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
