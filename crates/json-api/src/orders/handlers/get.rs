//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{OrderItemRecord, OrderRecord, ShippingAddress};

use crate::{extensions::*, orders::into_status_error, state::State};

/// Shipping Address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressBody {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            full_name: body.full_name,
            phone: body.phone,
            address_line1: body.address_line1,
            address_line2: body.address_line2,
            city: body.city,
            state: body.state,
            pincode: body.pincode,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            full_name: address.full_name,
            phone: address.phone,
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            state: address.state,
            pincode: address.pincode,
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub product_name: String,
    pub quantity: u32,

    /// Unit price when the order was placed
    pub price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: u64,
    pub discount_uuid: Option<Uuid>,
    pub discount_amount: u64,
    pub coins_used: u64,

    /// Amount payable, never negative
    pub total: u64,
    pub payment_method: String,
    pub shipping_address: ShippingAddressBody,
    pub status: String,
    pub created_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            items: order.items.into_iter().map(Into::into).collect(),
            subtotal: order.subtotal,
            discount_uuid: order.discount_uuid.map(|discount| discount.into_uuid()),
            discount_amount: order.discount_amount,
            coins_used: order.coins_used,
            total: order.total,
            payment_method: order.payment_method.to_string(),
            shipping_address: order.shipping_address.into(),
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Other users' orders are reported as missing.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order(principal, uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::orders::{OrdersServiceError, records::OrderUuid};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_ADMIN, TEST_USER, make_order, service};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{uuid}").get(handler)
    }

    #[tokio::test]
    async fn test_owner_reads_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |principal, order| *principal == TEST_USER && *order == uuid)
            .return_once(move |_, _| Ok(make_order(uuid, TEST_USER.user)));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&service(mocks, Some(TEST_USER), route()))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.total, 900);
        assert_eq!(body.payment_method, "cod");
        assert_eq!(body.status, "pending");
        assert_eq!(body.shipping_address.pincode, "110001");

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_reads_any_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(|principal, _| *principal == TEST_ADMIN)
            .return_once(move |_, _| Ok(make_order(uuid, TEST_USER.user)));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&service(mocks, Some(TEST_ADMIN), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&service(mocks, Some(TEST_USER), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
