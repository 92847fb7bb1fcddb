//! App Router

use salvo::Router;

use crate::{
    auth::{
        self,
        middleware::{authenticate, require},
    },
    carts, categories, discounts, notifications, orders, products, users,
};

/// Every storefront route. Bearer tokens are resolved for all of them;
/// `require` marks the ones that reject anonymous callers.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(authenticate)
        .push(
            Router::with_path("auth")
                .push(Router::with_path("signup").post(auth::signup::handler))
                .push(Router::with_path("login").post(auth::login::handler))
                .push(
                    Router::with_path("logout")
                        .hoop(require)
                        .post(auth::logout::handler),
                ),
        )
        .push(Router::with_path("me").hoop(require).get(users::me::handler))
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .push(Router::new().hoop(require).post(categories::create::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::new().hoop(require).post(products::create::handler))
                .push(Router::with_path("{slug}").get(products::get::handler))
                .push(
                    Router::with_path("{uuid}")
                        .hoop(require)
                        .put(products::update::handler),
                ),
        )
        .push(
            Router::with_path("discounts")
                .hoop(require)
                .post(discounts::create::handler),
        )
        .push(
            Router::with_path("cart")
                .hoop(require)
                .get(carts::get::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .hoop(require)
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{uuid}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("notifications")
                .hoop(require)
                .get(notifications::index::handler)
                .push(Router::with_path("{uuid}").delete(notifications::delete::handler)),
        )
}
