//! Auth Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::{auth::AuthServiceError, database::is_retryable};

use crate::retry::unavailable;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound => {
            StatusError::unauthorized().brief("Invalid or expired session token")
        }
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::AlreadyExists => {
            StatusError::conflict().brief("An account with this email already exists")
        }
        AuthServiceError::Sql(source) if is_retryable(&source) => {
            warn!("auth storage temporarily unavailable: {source}");

            unavailable()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("password hashing failed: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::HashingTask(source) => {
            error!("password hashing task failed: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Expiry(source) => {
            error!("session expiry out of range: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process session token: {source}");

            StatusError::internal_server_error()
        }
    }
}
