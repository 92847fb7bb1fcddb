//! Create Discount Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::discounts::{
    data::NewDiscount,
    records::{DiscountKind, DiscountRecord, DiscountUuid},
};

use crate::{discounts::into_status_error, extensions::*, state::State};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DiscountKindBody {
    /// `value` currency units off the subtotal
    Flat,

    /// `value` percent of the subtotal
    Percentage,
}

impl From<DiscountKindBody> for DiscountKind {
    fn from(kind: DiscountKindBody) -> Self {
        match kind {
            DiscountKindBody::Flat => DiscountKind::Flat,
            DiscountKindBody::Percentage => DiscountKind::Percentage,
        }
    }
}

/// Create Discount Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateDiscountRequest {
    pub code: String,
    pub kind: DiscountKindBody,
    pub value: u64,

    /// RFC 3339 timestamp after which the code stops working
    pub expires_at: String,

    /// How many orders may redeem the code
    pub max_uses: u64,
}

/// Discount Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountResponse {
    pub uuid: Uuid,
    pub code: String,
    pub kind: String,
    pub value: u64,
    pub expires_at: String,
    pub max_uses: u64,
    pub used_count: u64,
    pub created_at: String,
}

impl From<DiscountRecord> for DiscountResponse {
    fn from(discount: DiscountRecord) -> Self {
        Self {
            uuid: discount.uuid.into_uuid(),
            code: discount.code,
            kind: discount.kind.to_string(),
            value: discount.value,
            expires_at: discount.expires_at.to_string(),
            max_uses: discount.max_uses,
            used_count: discount.used_count,
            created_at: discount.created_at.to_string(),
        }
    }
}

/// Create Discount Handler
#[endpoint(
    tags("discounts"),
    summary = "Create Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Discount created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::CONFLICT, description = "Code already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDiscountRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DiscountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let expires_at = request
        .expires_at
        .parse::<Timestamp>()
        .or_400("could not parse expires_at")?;

    let discount = state
        .app
        .discounts
        .create_discount(
            principal,
            NewDiscount {
                uuid: DiscountUuid::new(),
                code: request.code,
                kind: request.kind.into(),
                value: request.value,
                expires_at,
                max_uses: request.max_uses,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(discount.into()))
}
