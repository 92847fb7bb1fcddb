//! Current User Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::users::data::Profile;

use crate::{extensions::*, state::State, users::into_status_error};

/// Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    pub uuid: Uuid,
    pub email: String,
    pub role: String,

    /// Loyalty coin balance
    pub coins: u64,

    /// Orders placed so far
    pub order_count: u64,
    pub created_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            uuid: profile.user.uuid.into_uuid(),
            email: profile.user.email,
            role: profile.user.role.to_string(),
            coins: profile.user.coins,
            order_count: profile.order_count,
            created_at: profile.user.created_at.to_string(),
        }
    }
}

/// Current User Handler
#[endpoint(
    tags("users"),
    summary = "Current User Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let profile = state
        .app
        .users
        .get_profile(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}
