//! Orders service.
//!
//! Checkout turns the caller's cart into an immutable order inside a single
//! serializable transaction. The cart, the user row and the discount row are
//! locked up front, every business rule is checked before the first write,
//! and counters are only ever changed through guarded updates. Any error drops
//! the transaction, which rolls back every write made so far.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        access::{self, Principal},
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        discounts::{records::DiscountRecord, repository::PgDiscountsRepository},
        notifications::{
            data::NewNotification,
            records::{NotificationKind, NotificationUuid},
            repository::PgNotificationsRepository,
        },
        orders::{
            data::{Checkout, NewOrder, OrderPage, PageRequest},
            errors::OrdersServiceError,
            pricing::{self, OrderTotals},
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
            settings::{CheckoutSettings, InvalidDiscountPolicy},
        },
        users::repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    settings: CheckoutSettings,
    orders: PgOrdersRepository,
    carts: PgCartsRepository,
    cart_items: PgCartItemsRepository,
    discounts: PgDiscountsRepository,
    users: PgUsersRepository,
    notifications: PgNotificationsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, settings: CheckoutSettings) -> Self {
        Self {
            db,
            settings,
            orders: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            discounts: PgDiscountsRepository::new(),
            users: PgUsersRepository::new(),
            notifications: PgNotificationsRepository::new(),
        }
    }

    /// Looks up and evaluates the discount code. `Ok(None)` means no discount
    /// applies and the policy allows the order to proceed without one.
    async fn resolve_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: Option<&str>,
        subtotal: u64,
    ) -> Result<Option<(DiscountRecord, u64)>, OrdersServiceError> {
        let Some(code) = code.filter(|code| !code.is_empty()) else {
            return Ok(None);
        };

        let discount = self
            .discounts
            .lock_discount_by_code(tx, code)
            .await?
            .filter(|discount| discount.is_redeemable(Timestamp::now()));

        match (discount, self.settings.invalid_discount) {
            (Some(discount), _) => {
                let amount = discount.amount_off(subtotal)?;

                Ok(Some((discount, amount)))
            }
            (None, InvalidDiscountPolicy::Reject) => Err(OrdersServiceError::DiscountInvalid),
            (None, InvalidDiscountPolicy::Ignore) => {
                warn!(code, "ignoring discount code that cannot be redeemed");

                Ok(None)
            }
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, principal, checkout),
        fields(
            user_uuid = %principal.user,
            order_uuid = tracing::field::Empty,
            subtotal = tracing::field::Empty,
            discount_amount = tracing::field::Empty,
            coins_used = checkout.coins_to_use,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        principal: Principal,
        checkout: Checkout,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_serializable_transaction().await?;

        let cart = self
            .carts
            .lock_cart(&mut tx, principal.user)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        let cart_items = self.cart_items.get_cart_items(&mut tx, cart.uuid).await?;

        if cart_items.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let lines: Vec<OrderItemRecord> = cart_items
            .into_iter()
            .map(|item| OrderItemRecord {
                product_uuid: item.product.uuid,
                product_name: item.product.name,
                quantity: item.quantity,
                price: item.product.price,
            })
            .collect();

        let subtotal = pricing::subtotal(&lines)?;

        let user = self.users.lock_user(&mut tx, principal.user).await?;

        if checkout.coins_to_use > user.coins {
            return Err(OrdersServiceError::InsufficientCoins {
                requested: checkout.coins_to_use,
                available: user.coins,
            });
        }

        let discount = self
            .resolve_discount(&mut tx, checkout.discount_code.as_deref(), subtotal)
            .await?;

        let discount_amount = discount.as_ref().map_or(0, |(_, amount)| *amount);

        let totals = OrderTotals::compute(
            subtotal,
            discount_amount,
            checkout.coins_to_use,
            self.settings.coin_value,
        )?;

        let span = Span::current();

        span.record("subtotal", totals.subtotal);
        span.record("discount_amount", totals.discount_amount);
        span.record("total", totals.total);

        let order = self
            .orders
            .create_order(
                &mut tx,
                NewOrder {
                    uuid: OrderUuid::new(),
                    user_uuid: principal.user,
                    items: lines,
                    totals,
                    discount_uuid: discount.as_ref().map(|(discount, _)| discount.uuid),
                    payment_method: checkout.payment_method,
                    shipping_address: checkout.shipping_address,
                },
            )
            .await?;

        span.record("order_uuid", tracing::field::display(order.uuid));

        if let Some((discount, _)) = &discount {
            if !self.discounts.redeem_discount(&mut tx, discount.uuid).await? {
                return Err(OrdersServiceError::DiscountInvalid);
            }
        }

        let balance = if totals.coins_used > 0 {
            self.users
                .debit_coins(&mut tx, principal.user, totals.coins_used)
                .await?
                .ok_or(OrdersServiceError::InsufficientCoins {
                    requested: totals.coins_used,
                    available: user.coins,
                })?
        } else {
            user.coins
        };

        self.cart_items.clear_items(&mut tx, cart.uuid).await?;
        self.carts.touch_cart(&mut tx, cart.uuid).await?;

        let order_count = self.orders.count_orders(&mut tx, principal.user).await?;
        let settled = self.settings.loyalty.settle(order_count, balance);

        if settled != balance {
            self.users.set_coins(&mut tx, principal.user, settled).await?;

            info!(
                user_uuid = %principal.user,
                order_count,
                coins = settled,
                "awarded loyalty coins"
            );
        }

        self.notifications
            .create_notification(
                &mut tx,
                NewNotification {
                    uuid: NotificationUuid::new(),
                    user_uuid: principal.user,
                    message: format!(
                        "Your order {} has been placed. Total: {}",
                        order.uuid, order.total
                    ),
                    kind: NotificationKind::OrderPlaced,
                },
            )
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %order.uuid,
            user_uuid = %principal.user,
            total = order.total,
            "placed order"
        );

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self, principal),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn list_orders(
        &self,
        principal: Principal,
        page: PageRequest,
    ) -> Result<OrderPage, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let total = self.orders.count_orders(&mut tx, principal.user).await?;
        let orders = self
            .orders
            .list_orders(&mut tx, principal.user, page)
            .await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self, principal),
        fields(user_uuid = %principal.user, order_uuid = %order),
        err
    )]
    async fn get_order(
        &self,
        principal: Principal,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        if !access::owner_or_admin(Some(&principal)).permits_owner(order.user_uuid) {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Places an order from the caller's cart.
    async fn create_order(
        &self,
        principal: Principal,
        checkout: Checkout,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The caller's orders, newest first.
    async fn list_orders(
        &self,
        principal: Principal,
        page: PageRequest,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// A single order. Orders belonging to someone else are `NotFound` unless
    /// the caller is an admin.
    async fn get_order(
        &self,
        principal: Principal,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(all(test, feature = "integration"))]
mod tests {
    use testresult::TestResult;

    use crate::{
        context::ServiceSettings,
        domain::{
            carts::CartsService,
            discounts::records::DiscountKind,
            notifications::{NotificationsService, records::NotificationKind},
            orders::{loyalty::LoyaltyPolicy, settings::CheckoutSettings},
            products::{ProductsService, data::ProductUpdate, records::ProductStatus},
            users::records::Role,
        },
        test::{
            TestContext,
            helpers::{
                add_to_cart, admin, checkout, coins_of, create_discount, create_product,
                create_user, next_week, yesterday,
            },
        },
    };

    use super::*;

    const MAX_ATTEMPTS: usize = 10;

    /// Replays a checkout that lost a serialization race, the way a client honouring 503 would.
    async fn create_order_retrying(
        ctx: &TestContext,
        user: Principal,
        discount_code: Option<&str>,
        coins_to_use: u64,
    ) -> Result<OrderRecord, OrdersServiceError> {
        for _ in 0..MAX_ATTEMPTS {
            match ctx
                .orders
                .create_order(user, checkout(discount_code, coins_to_use))
                .await
            {
                Err(error) if error.is_retryable() => {}
                result => return result,
            }
        }

        ctx.orders
            .create_order(user, checkout(discount_code, coins_to_use))
            .await
    }

    async fn cart_with_two_at_500(ctx: &TestContext) -> Principal {
        let user = create_user(ctx, Role::User, 0).await;
        let product = create_product(ctx, "lamp", 500, 10, ProductStatus::Published).await;

        add_to_cart(ctx, user, product.uuid, 2).await;

        user
    }

    #[tokio::test]
    async fn plain_checkout_charges_the_subtotal() -> TestResult {
        let ctx = TestContext::new().await;
        let user = cart_with_two_at_500(&ctx).await;

        let order = ctx.orders.create_order(user, checkout(None, 0)).await?;

        assert_eq!(order.subtotal, 1000);
        assert_eq!(order.discount_amount, 0);
        assert_eq!(order.coins_used, 0);
        assert_eq!(order.total, 1000);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.user_uuid, user.user);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empties_but_keeps_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = cart_with_two_at_500(&ctx).await;

        ctx.orders.create_order(user, checkout(None, 0)).await?;

        let cart = ctx.carts.get_cart(user).await?.ok_or("cart should exist")?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn percentage_discount_is_applied_and_redeemed() -> TestResult {
        let ctx = TestContext::new().await;
        let user = cart_with_two_at_500(&ctx).await;
        let discount =
            create_discount(&ctx, "SAVE10", DiscountKind::Percentage, 10, next_week(), 5).await;

        let order = ctx
            .orders
            .create_order(user, checkout(Some("SAVE10"), 0))
            .await?;

        assert_eq!(order.discount_amount, 100);
        assert_eq!(order.total, 900);
        assert_eq!(order.discount_uuid, Some(discount.uuid));

        let used: i64 = sqlx::query_scalar("SELECT used_count FROM discounts WHERE uuid = $1")
            .bind(discount.uuid.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(used, 1);

        Ok(())
    }

    #[tokio::test]
    async fn coins_reduce_the_total_and_the_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 5).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        add_to_cart(&ctx, user, product.uuid, 2).await;

        let order = ctx.orders.create_order(user, checkout(None, 3)).await?;

        assert_eq!(order.coins_used, 3);
        assert_eq!(order.total, 700);
        assert_eq!(coins_of(&ctx, user.user).await, 2);

        Ok(())
    }

    #[tokio::test]
    async fn spending_more_coins_than_held_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 2).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        add_to_cart(&ctx, user, product.uuid, 2).await;

        let result = ctx.orders.create_order(user, checkout(None, 5)).await;

        assert!(matches!(
            result,
            Err(OrdersServiceError::InsufficientCoins {
                requested: 5,
                available: 2
            })
        ));

        assert_eq!(coins_of(&ctx, user.user).await, 2);

        let page = ctx.orders.list_orders(user, PageRequest::default()).await?;

        assert_eq!(page.total, 0);

        let cart = ctx.carts.get_cart(user).await?.ok_or("cart should exist")?;

        assert_eq!(cart.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn expired_codes_are_ignored_by_default() -> TestResult {
        let ctx = TestContext::new().await;
        let user = cart_with_two_at_500(&ctx).await;

        create_discount(&ctx, "OLD10", DiscountKind::Percentage, 10, yesterday(), 5).await;

        let order = ctx
            .orders
            .create_order(user, checkout(Some("OLD10"), 0))
            .await?;

        assert_eq!(order.discount_amount, 0);
        assert_eq!(order.total, 1000);
        assert_eq!(order.discount_uuid, None);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_codes_fail_under_the_reject_policy() -> TestResult {
        let ctx = TestContext::with_settings(ServiceSettings {
            checkout: CheckoutSettings {
                invalid_discount: InvalidDiscountPolicy::Reject,
                ..CheckoutSettings::default()
            },
            ..ServiceSettings::default()
        })
        .await;

        let user = cart_with_two_at_500(&ctx).await;

        let result = ctx
            .orders
            .create_order(user, checkout(Some("NOPE"), 0))
            .await;

        assert!(matches!(result, Err(OrdersServiceError::DiscountInvalid)));

        let page = ctx.orders.list_orders(user, PageRequest::default()).await?;

        assert_eq!(page.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_codes_stop_discounting() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 0).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        create_discount(&ctx, "ONCE", DiscountKind::Flat, 50, next_week(), 1).await;

        add_to_cart(&ctx, user, product.uuid, 1).await;
        let first = ctx.orders.create_order(user, checkout(Some("ONCE"), 0)).await?;

        add_to_cart(&ctx, user, product.uuid, 1).await;
        let second = ctx.orders.create_order(user, checkout(Some("ONCE"), 0)).await?;

        assert_eq!(first.total, 450);
        assert_eq!(second.total, 500);

        Ok(())
    }

    #[tokio::test]
    async fn milestone_coins_land_on_the_fourth_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 0).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        for _ in 0..4 {
            add_to_cart(&ctx, user, product.uuid, 1).await;
            ctx.orders.create_order(user, checkout(None, 0)).await?;
        }

        assert_eq!(coins_of(&ctx, user.user).await, 2);

        Ok(())
    }

    #[tokio::test]
    async fn additive_policy_adds_milestone_coins() -> TestResult {
        let ctx = TestContext::with_settings(ServiceSettings {
            checkout: CheckoutSettings {
                loyalty: LoyaltyPolicy::Additive,
                ..CheckoutSettings::default()
            },
            ..ServiceSettings::default()
        })
        .await;

        let user = create_user(&ctx, Role::User, 3).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        for _ in 0..2 {
            add_to_cart(&ctx, user, product.uuid, 1).await;
            ctx.orders.create_order(user, checkout(None, 0)).await?;
        }

        assert_eq!(coins_of(&ctx, user.user).await, 4);

        Ok(())
    }

    #[tokio::test]
    async fn empty_carts_cannot_be_checked_out() {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 0).await;

        let result = ctx.orders.create_order(user, checkout(None, 0)).await;

        assert!(matches!(result, Err(OrdersServiceError::EmptyCart)));
    }

    #[tokio::test]
    async fn placing_an_order_notifies_the_buyer() -> TestResult {
        let ctx = TestContext::new().await;
        let user = cart_with_two_at_500(&ctx).await;

        let order = ctx.orders.create_order(user, checkout(None, 0)).await?;
        let notifications = ctx.notifications.list_notifications(user).await?;

        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications.first().map(|n| n.kind),
            Some(NotificationKind::OrderPlaced)
        );
        assert!(
            notifications
                .first()
                .is_some_and(|n| n.message.contains(&order.uuid.to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn orders_are_private_to_their_owner_and_admins() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = cart_with_two_at_500(&ctx).await;
        let stranger = create_user(&ctx, Role::User, 0).await;
        let admin = create_user(&ctx, Role::Admin, 0).await;

        let order = ctx.orders.create_order(owner, checkout(None, 0)).await?;

        assert!(matches!(
            ctx.orders.get_order(stranger, order.uuid).await,
            Err(OrdersServiceError::NotFound)
        ));

        let seen_by_admin = ctx.orders.get_order(admin, order.uuid).await?;

        assert_eq!(seen_by_admin, order);

        Ok(())
    }

    #[tokio::test]
    async fn order_listing_is_paged_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 0).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        let mut placed = Vec::new();

        for _ in 0..3 {
            add_to_cart(&ctx, user, product.uuid, 1).await;
            placed.push(ctx.orders.create_order(user, checkout(None, 0)).await?.uuid);
        }

        let page = ctx
            .orders
            .list_orders(user, PageRequest::new(Some(1), Some(2)).ok_or("valid page")?)
            .await?;

        assert_eq!(page.total, 3);
        assert_eq!(page.orders.len(), 2);
        assert_eq!(page.orders.first().map(|o| o.uuid), placed.last().copied());

        Ok(())
    }

    #[tokio::test]
    async fn subtotal_uses_the_price_at_checkout_time() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 0).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        add_to_cart(&ctx, user, product.uuid, 2).await;

        ctx.products
            .update_product(
                admin(),
                product.uuid,
                ProductUpdate {
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    description: product.description.clone(),
                    price: 600,
                    stock: product.stock,
                    status: product.status,
                    categories: product.categories.to_vec(),
                },
            )
            .await?;

        let order = ctx.orders.create_order(user, checkout(None, 0)).await?;

        assert_eq!(order.subtotal, 1200);
        assert_eq!(order.items.first().map(|item| item.price), Some(600));
        assert_eq!(order.total, 1200);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_of_one_cart_place_one_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, Role::User, 5).await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;

        add_to_cart(&ctx, user, product.uuid, 2).await;

        let (first, second) = tokio::join!(
            create_order_retrying(&ctx, user, None, 3),
            create_order_retrying(&ctx, user, None, 3),
        );

        let placed = [&first, &second]
            .iter()
            .filter(|result| result.is_ok())
            .count();

        let refused_as_empty = [&first, &second]
            .iter()
            .filter(|result| matches!(result, Err(OrdersServiceError::EmptyCart)))
            .count();

        assert_eq!(placed, 1, "exactly one checkout should win: {first:?} / {second:?}");
        assert_eq!(refused_as_empty, 1, "the loser should find the cart empty");

        assert_eq!(coins_of(&ctx, user.user).await, 2);

        let page = ctx.orders.list_orders(user, PageRequest::default()).await?;

        assert_eq!(page.total, 1);

        let cart = ctx.carts.get_cart(user).await?.ok_or("cart should exist")?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn a_single_use_code_is_redeemed_once_under_contention() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, "lamp", 500, 10, ProductStatus::Published).await;
        let discount = create_discount(&ctx, "ONCE", DiscountKind::Flat, 50, next_week(), 1).await;

        let alice = create_user(&ctx, Role::User, 0).await;
        let bob = create_user(&ctx, Role::User, 0).await;

        add_to_cart(&ctx, alice, product.uuid, 1).await;
        add_to_cart(&ctx, bob, product.uuid, 1).await;

        let (first, second) = tokio::join!(
            create_order_retrying(&ctx, alice, Some("ONCE"), 0),
            create_order_retrying(&ctx, bob, Some("ONCE"), 0),
        );

        let orders = [first?, second?];

        let discounted = orders
            .iter()
            .filter(|order| order.discount_uuid == Some(discount.uuid))
            .count();

        assert_eq!(discounted, 1, "only one order may carry the code");
        assert!(orders.iter().any(|order| order.total == 450));
        assert!(orders.iter().any(|order| order.total == 500));

        let used: i64 = sqlx::query_scalar("SELECT used_count FROM discounts WHERE uuid = $1")
            .bind(discount.uuid.into_uuid())
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(used, 1);

        Ok(())
    }
}
