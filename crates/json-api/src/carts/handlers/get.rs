//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::records::{CartItemRecord, CartRecord};

use crate::{carts::into_status_error, extensions::*, products::get::ProductResponse, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// Entries in the order they were first added
    pub items: Vec<CartItemResponse>,

    /// Sum of current price times quantity
    pub subtotal: u64,

    pub created_at: String,

    /// Moves on every change to the cart
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        let subtotal = cart
            .items
            .iter()
            .map(|item| item.product.price.saturating_mul(u64::from(item.quantity)))
            .fold(0, u64::saturating_add);

        CartResponse {
            uuid: cart.uuid.into_uuid(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The product at its current values
    pub product: ProductResponse,
    pub quantity: u32,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            product: item.product.into(),
            quantity: item.quantity,
        }
    }
}

/// Get Cart Handler
///
/// Responds `204` when the caller has never added anything.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart", body = CartResponse),
        (status_code = StatusCode::NO_CONTENT, description = "No cart yet"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(principal)
        .await
        .map_err(into_status_error)?;

    match cart {
        Some(cart) => res.render(Json(CartResponse::from(cart))),
        None => {
            res.status_code(StatusCode::NO_CONTENT);
        }
    }

    Ok(())
}
