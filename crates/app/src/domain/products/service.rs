//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        access::{self, Principal, Scope},
        products::{
            data::{NewProduct, ProductQuery, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid},
            repository::{PgProductsRepository, ProductFilter},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(name = "products.service.list_products", skip(self, principal), err)]
    async fn list_products(
        &self,
        principal: Option<Principal>,
        query: ProductQuery,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let scope = access::product_visibility(principal.as_ref());

        let mut tx = self.db.begin_transaction().await?;

        let products = self
            .repository
            .list_products(
                &mut tx,
                ProductFilter {
                    include_drafts: scope == Scope::All,
                    category: query.category.as_deref(),
                    search: query.search.as_deref(),
                    limit: query.effective_limit(),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    #[tracing::instrument(
        name = "products.service.get_product_by_slug",
        skip(self, principal),
        err
    )]
    async fn get_product_by_slug(
        &self,
        principal: Option<Principal>,
        slug: String,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let scope = access::product_visibility(principal.as_ref());

        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product_by_slug(&mut tx, &slug).await?;

        tx.commit().await?;

        if !scope.permits_status(product.status) {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, principal, product),
        fields(product_uuid = %product.uuid, price = product.price, stock = product.stock),
        err
    )]
    async fn create_product(
        &self,
        principal: Principal,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if access::admin_only(Some(&principal)).is_denied() {
            return Err(ProductsServiceError::Forbidden);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, slug = %created.slug, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, principal, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        principal: Principal,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if access::admin_only(Some(&principal)).is_denied() {
            return Err(ProductsServiceError::Forbidden);
        }

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        tx.commit().await?;

        info!(product_uuid = %updated.uuid, "updated product");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Catalog listing, newest first. Drafts are only included for admins.
    async fn list_products(
        &self,
        principal: Option<Principal>,
        query: ProductQuery,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product by slug. Drafts are `NotFound` for non-admins.
    async fn get_product_by_slug(
        &self,
        principal: Option<Principal>,
        slug: String,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a product. Admin only.
    async fn create_product(
        &self,
        principal: Principal,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces a product's editable fields. Admin only.
    async fn update_product(
        &self,
        principal: Principal,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(all(test, feature = "integration"))]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            categories::{CategoriesService, data::NewCategory, records::CategoryUuid},
            products::records::ProductStatus,
            users::records::{Role, UserUuid},
        },
        test::{
            TestContext,
            helpers::{admin, create_product},
        },
    };

    use super::*;

    fn shopper() -> Principal {
        Principal::new(UserUuid::new(), Role::User)
    }

    fn slugs(products: &[ProductRecord]) -> Vec<&str> {
        products.iter().map(|product| product.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_everyone_but_admins() -> TestResult {
        let ctx = TestContext::new().await;

        create_product(&ctx, "lamp", 500, 3, ProductStatus::Published).await;
        create_product(&ctx, "prototype", 900, 1, ProductStatus::Draft).await;

        let anonymous = ctx.products.list_products(None, ProductQuery::default()).await?;
        let user = ctx
            .products
            .list_products(Some(shopper()), ProductQuery::default())
            .await?;
        let admin_view = ctx
            .products
            .list_products(Some(admin()), ProductQuery::default())
            .await?;

        assert_eq!(slugs(&anonymous), vec!["lamp"]);
        assert_eq!(slugs(&user), vec!["lamp"]);
        assert_eq!(admin_view.len(), 2);

        assert!(matches!(
            ctx.products
                .get_product_by_slug(None, "prototype".to_string())
                .await,
            Err(ProductsServiceError::NotFound)
        ));

        let draft = ctx
            .products
            .get_product_by_slug(Some(admin()), "prototype".to_string())
            .await?;

        assert_eq!(draft.status, ProductStatus::Draft);

        Ok(())
    }

    #[tokio::test]
    async fn listing_filters_by_category_and_search() -> TestResult {
        let ctx = TestContext::new().await;

        let lighting = ctx
            .categories
            .create_category(
                admin(),
                NewCategory {
                    uuid: CategoryUuid::new(),
                    name: "Lighting".to_string(),
                    slug: "lighting".to_string(),
                },
            )
            .await?;

        ctx.products
            .create_product(
                admin(),
                NewProduct {
                    uuid: ProductUuid::new(),
                    name: "Desk Lamp".to_string(),
                    slug: "desk-lamp".to_string(),
                    description: "Warm light".to_string(),
                    price: 500,
                    stock: 4,
                    status: ProductStatus::Published,
                    categories: vec![lighting.uuid],
                },
            )
            .await?;

        create_product(&ctx, "mug", 300, 4, ProductStatus::Published).await;

        let in_lighting = ctx
            .products
            .list_products(
                None,
                ProductQuery {
                    category: Some("lighting".to_string()),
                    ..ProductQuery::default()
                },
            )
            .await?;

        let searched = ctx
            .products
            .list_products(
                None,
                ProductQuery {
                    search: Some("LAMP".to_string()),
                    ..ProductQuery::default()
                },
            )
            .await?;

        assert_eq!(slugs(&in_lighting), vec!["desk-lamp"]);
        assert_eq!(slugs(&searched), vec!["desk-lamp"]);
        assert_eq!(
            in_lighting.first().map(|p| p.categories.to_vec()),
            Some(vec![lighting.uuid])
        );

        Ok(())
    }

    #[tokio::test]
    async fn listing_respects_the_limit() -> TestResult {
        let ctx = TestContext::new().await;

        for slug in ["a", "b", "c"] {
            create_product(&ctx, slug, 100, 1, ProductStatus::Published).await;
        }

        let products = ctx
            .products
            .list_products(
                None,
                ProductQuery {
                    limit: Some(2),
                    ..ProductQuery::default()
                },
            )
            .await?;

        assert_eq!(products.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn only_admins_write_the_catalog() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(
                shopper(),
                NewProduct {
                    uuid: ProductUuid::new(),
                    name: "Lamp".to_string(),
                    slug: "lamp".to_string(),
                    description: String::new(),
                    price: 500,
                    stock: 1,
                    status: ProductStatus::Published,
                    categories: Vec::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(ProductsServiceError::Forbidden)));
    }

    #[tokio::test]
    async fn duplicate_slugs_already_exist() {
        let ctx = TestContext::new().await;

        create_product(&ctx, "lamp", 500, 1, ProductStatus::Published).await;

        let result = ctx
            .products
            .create_product(
                admin(),
                NewProduct {
                    uuid: ProductUuid::new(),
                    name: "Other Lamp".to_string(),
                    slug: "lamp".to_string(),
                    description: String::new(),
                    price: 700,
                    stock: 1,
                    status: ProductStatus::Published,
                    categories: Vec::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(ProductsServiceError::AlreadyExists)));
    }

    #[tokio::test]
    async fn updates_replace_fields_and_publish() -> TestResult {
        let ctx = TestContext::new().await;
        let draft = create_product(&ctx, "lamp", 500, 1, ProductStatus::Draft).await;

        let updated = ctx
            .products
            .update_product(
                admin(),
                draft.uuid,
                ProductUpdate {
                    name: "Lamp".to_string(),
                    slug: "lamp".to_string(),
                    description: "Now available".to_string(),
                    price: 450,
                    stock: 9,
                    status: ProductStatus::Published,
                    categories: Vec::new(),
                },
            )
            .await?;

        assert_eq!(updated.price, 450);
        assert_eq!(updated.stock, 9);
        assert_eq!(updated.status, ProductStatus::Published);

        let visible = ctx
            .products
            .get_product_by_slug(None, "lamp".to_string())
            .await?;

        assert_eq!(visible.uuid, draft.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn updating_unknown_products_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .update_product(
                admin(),
                ProductUuid::new(),
                ProductUpdate {
                    name: "Ghost".to_string(),
                    slug: "ghost".to_string(),
                    description: String::new(),
                    price: 1,
                    stock: 0,
                    status: ProductStatus::Draft,
                    categories: Vec::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));
    }
}
