//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{create::ProductRequest, get::ProductResponse, into_status_error},
    state::State,
};

/// Product Update Handler
///
/// Replaces every editable field, categories included.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(uuid, json, depot),
    fields(
        product_uuid = tracing::field::Empty,
        price = tracing::field::Empty,
        categories_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();
    let uuid = uuid.into_inner();

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(uuid));
    span.record("price", request.price);
    span.record("categories_count", request.categories.len());

    let product = state
        .app
        .products
        .update_product(principal, uuid.into(), request.into())
        .await
        .map_err(into_status_error)?;

    info!(status = %product.status, "updated product");

    Ok(Json(product.into()))
}
