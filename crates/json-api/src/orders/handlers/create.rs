//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use storefront_app::domain::orders::{
    OrdersServiceError, data::Checkout, records::PaymentMethod,
};

use crate::{
    extensions::*,
    observability,
    orders::{
        get::{OrderResponse, ShippingAddressBody},
        into_status_error,
    },
    state::State,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PaymentMethodBody {
    Cod,
    Card,
    Upi,
    Netbanking,
}

impl From<PaymentMethodBody> for PaymentMethod {
    fn from(method: PaymentMethodBody) -> Self {
        match method {
            PaymentMethodBody::Cod => PaymentMethod::Cod,
            PaymentMethodBody::Card => PaymentMethod::Card,
            PaymentMethodBody::Upi => PaymentMethod::Upi,
            PaymentMethodBody::Netbanking => PaymentMethod::Netbanking,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub payment_method: PaymentMethodBody,

    /// Discount code to redeem
    pub discount_code: Option<String>,

    /// Loyalty coins to spend
    #[serde(default)]
    pub coins_to_use: u64,

    pub shipping_address: ShippingAddressBody,
}

impl From<CreateOrderRequest> for Checkout {
    fn from(request: CreateOrderRequest) -> Self {
        Checkout {
            payment_method: request.payment_method.into(),
            discount_code: request
                .discount_code
                .filter(|code| !code.trim().is_empty()),
            coins_to_use: request.coins_to_use,
            shipping_address: request.shipping_address.into(),
        }
    }
}

/// Create Order Handler
///
/// Places an order from the caller's cart and empties it.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Empty cart, insufficient coins or invalid discount"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Conflicting checkout, retry"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        payment_method = tracing::field::Empty,
        coins_to_use = tracing::field::Empty,
        has_discount_code = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let checkout = Checkout::from(json.into_inner());

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user));
    span.record("payment_method", checkout.payment_method.as_str());
    span.record("coins_to_use", checkout.coins_to_use);
    span.record("has_discount_code", checkout.discount_code.is_some());

    let order = state
        .app
        .orders
        .create_order(principal, checkout)
        .await
        .map_err(|error| {
            if let Some(reason) = rejection_reason(&error) {
                observability::observe_checkout_rejection(reason);
            }

            into_status_error(error)
        })?;

    info!(order_uuid = %order.uuid, total = order.total, "order placed");
    observability::observe_order_placed(order.payment_method.as_str(), order.total);

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

/// Metric label for checkouts refused by business rules; storage failures are not rejections.
fn rejection_reason(error: &OrdersServiceError) -> Option<&'static str> {
    match error {
        OrdersServiceError::EmptyCart => Some("empty_cart"),
        OrdersServiceError::InsufficientCoins { .. } => Some("insufficient_coins"),
        OrdersServiceError::DiscountInvalid => Some("discount_invalid"),
        OrdersServiceError::AmountOverflow => Some("amount_overflow"),
        _ => None,
    }
}
