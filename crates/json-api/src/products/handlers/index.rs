//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::data::ProductQuery;

use crate::{
    extensions::*,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// Visible products, newest first
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Lists published products. Admins also see drafts.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid query"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    q: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let limit = parse_optional_query::<u32>("limit", limit.into_inner())?;

    let query = ProductQuery {
        category: category.into_inner().filter(|slug| !slug.is_empty()),
        search: q.into_inner().filter(|text| !text.trim().is_empty()),
        limit,
    };

    let products = state
        .app
        .products
        .list_products(depot.principal(), query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::products::records::ProductUuid;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER, make_product, service};

    use super::*;

    fn route() -> Router {
        Router::with_path("products").get(handler)
    }

    #[tokio::test]
    async fn test_index_without_filters() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(|principal, query| principal.is_none() && *query == ProductQuery::default())
            .return_once(|_, _| Ok(vec![make_product(ProductUuid::new(), 500)]));

        let mut res = TestClient::get("http://example.com/products")
            .send(&service(mocks, None, route()))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.products.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(|principal, query| {
                *principal == Some(TEST_USER)
                    && *query
                        == ProductQuery {
                            category: Some("books".to_string()),
                            search: Some("engine".to_string()),
                            limit: Some(5),
                        }
            })
            .return_once(|_, _| Ok(vec![]));

        let mut res = TestClient::get("http://example.com/products?category=books&q=engine&limit=5")
            .send(&service(mocks, Some(TEST_USER), route()))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert!(body.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_non_numeric_limit_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.products.expect_list_products().never();

        let res = TestClient::get("http://example.com/products?limit=lots")
            .send(&service(mocks, None, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
