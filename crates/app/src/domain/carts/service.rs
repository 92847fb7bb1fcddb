//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        access::{self, Principal},
        carts::{
            errors::CartsServiceError,
            records::{CartRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, CartsServiceError> {
        match self.products_repository.get_product(tx, product).await {
            Ok(product) => Ok(product),
            Err(sqlx::Error::RowNotFound) => Err(CartsServiceError::ProductNotFound),
            Err(error) => Err(error.into()),
        }
    }

    async fn finish(
        &self,
        mut tx: Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut cart = self.carts_repository.touch_cart(&mut tx, cart).await?;

        let items = self.items_repository.get_cart_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }
}

fn ensure_in_stock(product: &ProductRecord, requested: u32) -> Result<(), CartsServiceError> {
    if u64::from(requested) > product.stock {
        return Err(CartsServiceError::InsufficientStock {
            requested: u64::from(requested),
            available: product.stock,
        });
    }

    Ok(())
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self, principal),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn get_cart(&self, principal: Principal) -> Result<Option<CartRecord>, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let Some(mut cart) = self
            .carts_repository
            .find_cart(&mut tx, principal.user)
            .await?
        else {
            return Ok(None);
        };

        let items = self.items_repository.get_cart_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(Some(cart))
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, principal),
        fields(
            user_uuid = %principal.user,
            product_uuid = %product,
            cart_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        principal: Principal,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        let Ok(increment) = i32::try_from(quantity) else {
            return Err(CartsServiceError::InvalidQuantity);
        };

        if increment < 1 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let product = self.load_product(&mut tx, product).await?;

        if !access::product_visibility(Some(&principal)).permits_status(product.status) {
            return Err(CartsServiceError::ProductNotFound);
        }

        ensure_in_stock(&product, quantity)?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, CartUuid::new(), principal.user)
            .await?;

        Span::current().record("cart_uuid", tracing::field::display(cart.uuid));

        let total_quantity = self
            .items_repository
            .add_quantity(&mut tx, cart.uuid, product.uuid, increment)
            .await?;

        ensure_in_stock(&product, total_quantity)?;

        let cart = self.finish(tx, cart.uuid).await?;

        info!(
            cart_uuid = %cart.uuid,
            product_uuid = %product.uuid,
            quantity = total_quantity,
            "added item to cart"
        );

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self, principal),
        fields(
            user_uuid = %principal.user,
            product_uuid = %product,
            cart_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn update_item(
        &self,
        principal: Principal,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, principal.user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        Span::current().record("cart_uuid", tracing::field::display(cart.uuid));

        if quantity <= 0 {
            let removed = self
                .items_repository
                .delete_item(&mut tx, cart.uuid, product)
                .await?;

            let cart = self.finish(tx, cart.uuid).await?;

            if removed > 0 {
                info!(cart_uuid = %cart.uuid, product_uuid = %product, "removed item from cart");
            }

            return Ok(cart);
        }

        let (Ok(requested), Ok(stored)) = (u32::try_from(quantity), i32::try_from(quantity)) else {
            return Err(CartsServiceError::InvalidQuantity);
        };

        let updated = self
            .items_repository
            .set_quantity(&mut tx, cart.uuid, product, stored)
            .await?;

        if updated > 0 {
            let product = self.load_product(&mut tx, product).await?;

            ensure_in_stock(&product, requested)?;
        }

        let cart = self.finish(tx, cart.uuid).await?;

        if updated > 0 {
            info!(
                cart_uuid = %cart.uuid,
                product_uuid = %product,
                quantity = requested,
                "updated cart item quantity"
            );
        }

        Ok(cart)
    }

    async fn remove_item(
        &self,
        principal: Principal,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        self.update_item(principal, product, 0).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's cart with products expanded, or `None` if they never added anything.
    async fn get_cart(&self, principal: Principal) -> Result<Option<CartRecord>, CartsServiceError>;

    /// Adds `quantity` of a product, creating the cart on first use.
    async fn add_item(
        &self,
        principal: Principal,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Sets an entry's quantity. A quantity of zero or less removes the entry.
    async fn update_item(
        &self,
        principal: Principal,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Removes the product's entry from the caller's cart.
    async fn remove_item(
        &self,
        principal: Principal,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;
}
