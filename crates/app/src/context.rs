//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, AuthSettings, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        categories::{CategoriesService, PgCategoriesService},
        discounts::{DiscountsService, PgDiscountsService},
        notifications::{NotificationsService, PgNotificationsService},
        orders::{OrdersService, PgOrdersService, settings::CheckoutSettings},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Settings that shape service behaviour rather than connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceSettings {
    pub auth: AuthSettings,
    pub checkout: CheckoutSettings,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub discounts: Arc<dyn DiscountsService>,
    pub orders: Arc<dyn OrdersService>,
    pub notifications: Arc<dyn NotificationsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        settings: ServiceSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool), settings))
    }

    /// Wire every Postgres-backed service onto one pool.
    #[must_use]
    pub fn from_db(db: &Db, settings: ServiceSettings) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(db.clone(), settings.auth)),
            users: Arc::new(PgUsersService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            discounts: Arc::new(PgDiscountsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), settings.checkout)),
            notifications: Arc::new(PgNotificationsService::new(db.clone())),
        }
    }
}
