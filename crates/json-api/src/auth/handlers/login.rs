//! Login Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    auth::{Credentials, IssuedSession},
    domain::users::records::UserRecord,
};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Email and password
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<CredentialsRequest> for Credentials {
    fn from(request: CredentialsRequest) -> Self {
        Credentials {
            email: request.email,
            password: request.password,
        }
    }
}

/// Account Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountResponse {
    pub uuid: Uuid,
    pub email: String,

    /// `admin` or `user`
    pub role: String,

    /// Loyalty coin balance
    pub coins: u64,
    pub created_at: String,
}

impl From<UserRecord> for AccountResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            email: user.email,
            role: user.role.to_string(),
            coins: user.coins,
            created_at: user.created_at.to_string(),
        }
    }
}

/// Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// Bearer token. Only ever returned once.
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: String,

    pub user: AccountResponse,
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.session.expires_at.to_string(),
            user: issued.user.into(),
        }
    }
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Session issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CredentialsRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let issued = state
        .app
        .auth
        .log_in(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(issued.into()))
}
