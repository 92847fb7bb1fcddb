//! Orders Repository

use std::collections::HashMap;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{from_i64, to_i64},
    domain::{
        discounts::records::DiscountUuid,
        orders::{
            data::{NewOrder, PageRequest},
            records::{OrderItemRecord, OrderRecord, OrderUuid, ShippingAddress},
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        let address = &order.shipping_address;

        let mut created = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(to_i64(order.totals.subtotal, "subtotal")?)
            .bind(order.discount_uuid.map(DiscountUuid::into_uuid))
            .bind(to_i64(order.totals.discount_amount, "discount_amount")?)
            .bind(to_i64(order.totals.coins_used, "coins_used")?)
            .bind(to_i64(order.totals.total, "total")?)
            .bind(order.payment_method.as_str())
            .bind(&address.full_name)
            .bind(&address.phone)
            .bind(&address.address_line1)
            .bind(address.address_line2.as_deref())
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.pincode)
            .fetch_one(&mut **tx)
            .await?;

        let capacity = order.items.len();
        let mut lines = Vec::with_capacity(capacity);
        let mut products = Vec::with_capacity(capacity);
        let mut names = Vec::with_capacity(capacity);
        let mut quantities = Vec::with_capacity(capacity);
        let mut prices = Vec::with_capacity(capacity);

        for (line, item) in (1_i32..).zip(&order.items) {
            lines.push(line);
            products.push(item.product_uuid.into_uuid());
            names.push(item.product_name.clone());
            quantities.push(i32::try_from(item.quantity).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                }
            })?);
            prices.push(to_i64(item.price, "price")?);
        }

        query(CREATE_ORDER_ITEMS_SQL)
            .bind(order.uuid.into_uuid())
            .bind(lines)
            .bind(products)
            .bind(names)
            .bind(quantities)
            .bind(prices)
            .execute(&mut **tx)
            .await?;

        created.items = order.items;

        Ok(created)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, std::slice::from_mut(&mut order))
            .await?;

        Ok(order)
    }

    /// One page of the user's orders, newest first, with their items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(page.limit))
            .bind(to_i64(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, &mut orders).await?;

        Ok(orders)
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        from_i64(count, "count")
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut items: HashMap<OrderUuid, Vec<OrderItemRecord>> = HashMap::new();

        for row in rows {
            items.entry(row.order_uuid).or_default().push(row.item);
        }

        for order in orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

struct OrderItemRow {
    order_uuid: OrderUuid,
    item: OrderItemRecord,
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItemRecord {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                product_name: row.try_get("product_name")?,
                quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })?,
                price: from_i64(row.try_get("price")?, "price")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method: String = row.try_get("payment_method")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            subtotal: from_i64(row.try_get("subtotal")?, "subtotal")?,
            discount_uuid: row
                .try_get::<Option<Uuid>, _>("discount_uuid")?
                .map(DiscountUuid::from_uuid),
            discount_amount: from_i64(row.try_get("discount_amount")?, "discount_amount")?,
            coins_used: from_i64(row.try_get("coins_used")?, "coins_used")?,
            total: from_i64(row.try_get("total")?, "total")?,
            payment_method: payment_method
                .parse()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "payment_method".to_string(),
                    source: Box::new(e),
                })?,
            shipping_address: ShippingAddress {
                full_name: row.try_get("shipping_full_name")?,
                phone: row.try_get("shipping_phone")?,
                address_line1: row.try_get("shipping_address_line1")?,
                address_line2: row.try_get("shipping_address_line2")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
                pincode: row.try_get("shipping_pincode")?,
            },
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
