//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use smallvec::SmallVec;
use uuid::Uuid;

use storefront_app::{
    auth::{Authenticated, MockAuthService, SessionUuid},
    context::AppContext,
    domain::{
        access::Principal,
        carts::MockCartsService,
        categories::MockCategoriesService,
        discounts::MockDiscountsService,
        notifications::MockNotificationsService,
        orders::{
            MockOrdersService,
            records::{
                OrderItemRecord, OrderRecord, OrderStatus, OrderUuid, PaymentMethod,
                ShippingAddress,
            },
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductStatus, ProductUuid},
        },
        users::{
            MockUsersService,
            records::{Role, UserRecord, UserUuid},
        },
    },
};

use crate::{extensions::*, retry::retry_after, state::State};

pub(crate) const TEST_USER: Principal = Principal {
    user: UserUuid::from_uuid(Uuid::from_u128(1)),
    role: Role::User,
};

pub(crate) const TEST_ADMIN: Principal = Principal {
    user: UserUuid::from_uuid(Uuid::from_u128(2)),
    role: Role::Admin,
};

pub(crate) const TEST_SESSION: SessionUuid = SessionUuid::from_uuid(Uuid::from_u128(3));

/// One mock per service. Any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub auth: MockAuthService,
    pub users: MockUsersService,
    pub categories: MockCategoriesService,
    pub products: MockProductsService,
    pub carts: MockCartsService,
    pub discounts: MockDiscountsService,
    pub orders: MockOrdersService,
    pub notifications: MockNotificationsService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            users: Arc::new(self.users),
            categories: Arc::new(self.categories),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            discounts: Arc::new(self.discounts),
            orders: Arc::new(self.orders),
            notifications: Arc::new(self.notifications),
        })
    }
}

/// Stands in for the bearer middleware with a fixed caller.
struct InjectCaller(Authenticated);

#[handler]
impl InjectCaller {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_authenticated(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

/// Serve `route` with the given mocks, as `caller` when one is given.
pub(crate) fn service(mocks: Mocks, caller: Option<Principal>, route: Router) -> Service {
    let mut router = Router::new()
        .hoop(retry_after)
        .hoop(inject(mocks.into_state()));

    if let Some(principal) = caller {
        router = router.hoop(InjectCaller(Authenticated {
            principal,
            session: TEST_SESSION,
        }));
    }

    Service::new(router.push(route))
}

pub(crate) fn make_user(principal: Principal) -> UserRecord {
    UserRecord {
        uuid: principal.user,
        email: "ada@example.com".to_string(),
        role: principal.role,
        coins: 0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid, price: u64) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Analytical Engine".to_string(),
        slug: "analytical-engine".to_string(),
        description: "Steam powered".to_string(),
        price,
        stock: 10,
        status: ProductStatus::Published,
        categories: SmallVec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_shipping_address() -> ShippingAddress {
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

pub(crate) fn make_order(uuid: OrderUuid, owner: UserUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        user_uuid: owner,
        items: vec![OrderItemRecord {
            product_uuid: ProductUuid::from_uuid(Uuid::from_u128(10)),
            product_name: "Analytical Engine".to_string(),
            quantity: 2,
            price: 500,
        }],
        subtotal: 1000,
        discount_uuid: None,
        discount_amount: 100,
        coins_used: 0,
        total: 900,
        payment_method: PaymentMethod::Cod,
        shipping_address: make_shipping_address(),
        status: OrderStatus::Pending,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
