//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::{
    data::{MAX_PAGE_LIMIT, OrderPage, PageRequest},
    records::OrderRecord,
};

use crate::{extensions::*, orders::into_status_error, state::State};

/// Order Summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub uuid: Uuid,
    pub total: u64,
    pub status: String,

    /// Units across all line items
    pub item_count: u64,
    pub created_at: String,
}

impl From<OrderRecord> for OrderSummaryResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            total: order.total,
            status: order.status.to_string(),
            item_count: order
                .items
                .iter()
                .map(|item| u64::from(item.quantity))
                .sum(),
            created_at: order.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Newest first
    pub orders: Vec<OrderSummaryResponse>,

    /// Orders the caller has placed in total
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<OrderPage> for OrdersResponse {
    fn from(page: OrderPage) -> Self {
        Self {
            orders: page.orders.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

/// Order Index Handler
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid page or limit"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let page = parse_optional_query::<u32>("page", page.into_inner())?;
    let limit = parse_optional_query::<u32>("limit", limit.into_inner())?;

    let Some(page) = PageRequest::new(page, limit) else {
        return Err(StatusError::bad_request().brief(format!(
            "page must be at least 1 and limit between 1 and {MAX_PAGE_LIMIT}"
        )));
    };

    let orders = state
        .app
        .orders
        .list_orders(principal, page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into()))
}
