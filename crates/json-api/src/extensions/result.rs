//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Map any error to an HTTP error.
pub(crate) trait ResultExt<T> {
    /// A logged internal server error.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// A bad request naming what could not be parsed.
    fn or_400(self, brief: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, brief: &str) -> Result<T, StatusError> {
        self.map_err(|error| StatusError::bad_request().brief(format!("{brief}: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn or_400_keeps_the_parse_error() {
        let status = "yesterday"
            .parse::<Timestamp>()
            .or_400("could not parse expires_at")
            .err();

        assert_eq!(status.as_ref().map(|s| s.code), Some(StatusCode::BAD_REQUEST));
        assert!(
            status
                .map(|s| s.brief)
                .is_some_and(|brief| brief.starts_with("could not parse expires_at: "))
        );
    }
}
