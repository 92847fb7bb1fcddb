//! Sign Up Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use storefront_app::auth::AuthServiceError;

use crate::{
    auth::{
        into_status_error,
        login::{CredentialsRequest, SessionResponse},
    },
    extensions::*,
    state::State,
};

/// Sign Up Handler
///
/// Creates a `user` account and logs it in.
#[endpoint(
    tags("auth"),
    summary = "Sign Up",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid email or password too short"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CredentialsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let issued = state
        .app
        .auth
        .sign_up(json.into_inner().into())
        .await
        .map_err(|error| match error {
            AuthServiceError::InvalidCredentials => StatusError::bad_request()
                .brief("Email must contain @ and password must be at least 8 characters"),
            other => into_status_error(other),
        })?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(issued.into()))
}
