//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::{
    data::{NewProduct, ProductUpdate},
    records::{ProductStatus, ProductUuid},
};

use crate::{
    extensions::*,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ProductStatusBody {
    #[default]
    Draft,
    Published,
}

impl From<ProductStatusBody> for ProductStatus {
    fn from(status: ProductStatusBody) -> Self {
        match status {
            ProductStatusBody::Draft => ProductStatus::Draft,
            ProductStatusBody::Published => ProductStatus::Published,
        }
    }
}

/// Product Request
///
/// Used for both create and full update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub name: String,

    /// Unique URL identifier
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// Price in minor currency units
    pub price: u64,

    pub stock: u64,

    #[serde(default)]
    pub status: ProductStatusBody,

    /// Category UUIDs
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

impl From<ProductRequest> for NewProduct {
    fn from(request: ProductRequest) -> Self {
        NewProduct {
            uuid: ProductUuid::new(),
            name: request.name,
            slug: request.slug,
            description: request.description,
            price: request.price,
            stock: request.stock,
            status: request.status.into(),
            categories: request.categories.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ProductRequest> for ProductUpdate {
    fn from(request: ProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            slug: request.slug,
            description: request.description,
            price: request.price,
            stock: request.stock,
            status: request.status.into(),
            categories: request.categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let product = state
        .app
        .products
        .create_product(principal, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.slug), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
