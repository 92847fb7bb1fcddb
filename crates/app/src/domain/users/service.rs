//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        access::Principal,
        orders::repository::PgOrdersRepository,
        users::{
            data::Profile,
            errors::UsersServiceError,
            records::{Role, UserRecord},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    orders_repository: PgOrdersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
            orders_repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(
        name = "users.service.get_profile",
        skip(self, principal),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn get_profile(&self, principal: Principal) -> Result<Profile, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let user = self.repository.get_user(&mut tx, principal.user).await?;
        let order_count = self
            .orders_repository
            .count_orders(&mut tx, principal.user)
            .await?;

        tx.commit().await?;

        Ok(Profile { user, order_count })
    }

    #[tracing::instrument(name = "users.service.set_role", skip(self, email), err)]
    async fn set_role(&self, email: String, role: Role) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let user = self
            .repository
            .set_role_by_email(&mut tx, &email, role)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, role = %user.role, "updated user role");

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// The caller's own account and order count.
    async fn get_profile(&self, principal: Principal) -> Result<Profile, UsersServiceError>;

    /// Change the role of the account registered under `email`.
    async fn set_role(&self, email: String, role: Role) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(all(test, feature = "integration"))]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{orders::OrdersService, products::records::ProductStatus},
        test::{
            TestContext,
            helpers::{add_to_cart, checkout, create_product, create_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn profiles_count_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 7).await;
        let product = create_product(&ctx, "mug", 300, 5, ProductStatus::Published).await;

        let before = ctx.users.get_profile(user).await?;

        add_to_cart(&ctx, user, product.uuid, 1).await;
        ctx.orders.create_order(user, checkout(None, 0)).await?;

        let after = ctx.users.get_profile(user).await?;

        assert_eq!(before.order_count, 0);
        assert_eq!(before.user.coins, 7);
        assert_eq!(after.order_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn promoting_by_email_grants_admin() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 0).await;
        let email = format!("{}@EXAMPLE.com", user.user);

        let promoted = ctx.users.set_role(email, Role::Admin).await?;

        assert_eq!(promoted.uuid, user.user);
        assert_eq!(promoted.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    async fn promoting_unknown_emails_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .set_role("nobody@example.com".to_string(), Role::Admin)
            .await;

        assert!(matches!(result, Err(UsersServiceError::NotFound)));
    }
}
