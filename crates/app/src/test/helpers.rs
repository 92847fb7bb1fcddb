//! Test Helpers

use jiff::{SignedDuration, Timestamp};

use crate::{
    domain::{
        access::Principal,
        carts::{CartsService, records::CartRecord},
        discounts::{
            DiscountsService,
            data::NewDiscount,
            records::{DiscountKind, DiscountRecord, DiscountUuid},
        },
        orders::{
            data::Checkout,
            records::{PaymentMethod, ShippingAddress},
        },
        products::{
            ProductsService,
            data::NewProduct,
            records::{ProductRecord, ProductStatus, ProductUuid},
        },
        users::{
            data::NewUser,
            records::{Role, UserUuid},
            repository::PgUsersRepository,
        },
    },
    test::TestContext,
};

/// An admin principal for catalog writes that never touch the users table.
pub(crate) fn admin() -> Principal {
    Principal::new(UserUuid::new(), Role::Admin)
}

/// Insert a user row directly, skipping password hashing.
pub(crate) async fn create_user(ctx: &TestContext, role: Role, coins: u64) -> Principal {
    let uuid = UserUuid::new();
    let repository = PgUsersRepository::new();
    let mut tx = ctx.db.pool().begin().await.expect("begin should succeed");

    repository
        .create_user(
            &mut tx,
            NewUser {
                uuid,
                email: format!("{uuid}@example.com"),
                password_hash: "00:00".to_string(),
                role,
            },
        )
        .await
        .expect("create_user should succeed");

    repository
        .set_coins(&mut tx, uuid, coins)
        .await
        .expect("set_coins should succeed");

    tx.commit().await.expect("commit should succeed");

    Principal::new(uuid, role)
}

pub(crate) async fn coins_of(ctx: &TestContext, user: UserUuid) -> u64 {
    let coins: i64 = sqlx::query_scalar("SELECT coins FROM users WHERE uuid = $1")
        .bind(user.into_uuid())
        .fetch_one(ctx.db.pool())
        .await
        .expect("user should exist");

    u64::try_from(coins).expect("coins are never negative")
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    slug: &str,
    price: u64,
    stock: u64,
    status: ProductStatus,
) -> ProductRecord {
    ctx.products
        .create_product(
            admin(),
            NewProduct {
                uuid: ProductUuid::new(),
                name: slug.replace('-', " "),
                slug: slug.to_string(),
                description: format!("All about {slug}"),
                price,
                stock,
                status,
                categories: Vec::new(),
            },
        )
        .await
        .expect("create_product should succeed")
}

pub(crate) async fn create_discount(
    ctx: &TestContext,
    code: &str,
    kind: DiscountKind,
    value: u64,
    expires_at: Timestamp,
    max_uses: u64,
) -> DiscountRecord {
    ctx.discounts
        .create_discount(
            admin(),
            NewDiscount {
                uuid: DiscountUuid::new(),
                code: code.to_string(),
                kind,
                value,
                expires_at,
                max_uses,
            },
        )
        .await
        .expect("create_discount should succeed")
}

pub(crate) fn next_week() -> Timestamp {
    Timestamp::now() + SignedDuration::from_hours(24 * 7)
}

pub(crate) fn yesterday() -> Timestamp {
    Timestamp::now() - SignedDuration::from_hours(24)
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    principal: Principal,
    product: ProductUuid,
    quantity: u32,
) -> CartRecord {
    ctx.carts
        .add_item(principal, product, quantity)
        .await
        .expect("add_item should succeed")
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ada Lovelace".to_string(),
        phone: "5550100".to_string(),
        address_line1: "12 Analytical Row".to_string(),
        address_line2: None,
        city: "London".to_string(),
        state: "Greater London".to_string(),
        pincode: "110001".to_string(),
    }
}

pub(crate) fn checkout(discount_code: Option<&str>, coins_to_use: u64) -> Checkout {
    Checkout {
        payment_method: PaymentMethod::Cod,
        discount_code: discount_code.map(str::to_string),
        coins_to_use,
        shipping_address: shipping_address(),
    }
}
