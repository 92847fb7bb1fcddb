//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{from_i64, to_i64},
    domain::{
        categories::records::CategoryUuid,
        products::{
            data::{NewProduct, ProductUpdate},
            records::{ProductRecord, ProductUuid},
        },
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/get_product_by_slug.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const CLEAR_PRODUCT_CATEGORIES_SQL: &str = include_str!("sql/clear_product_categories.sql");
const ASSIGN_PRODUCT_CATEGORIES_SQL: &str = include_str!("sql/assign_product_categories.sql");

/// Listing parameters after access rules have been applied.
#[derive(Debug, Clone)]
pub(crate) struct ProductFilter<'a> {
    pub(crate) include_drafts: bool,
    pub(crate) category: Option<&'a str>,
    pub(crate) search: Option<&'a str>,
    pub(crate) limit: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: ProductFilter<'_>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(filter.include_drafts)
            .bind(filter.category)
            .bind(filter.search)
            .bind(i64::from(filter.limit))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.description)
            .bind(to_i64(product.price, "price")?)
            .bind(to_i64(product.stock, "stock")?)
            .bind(product.status.as_str())
            .execute(&mut **tx)
            .await?;

        self.assign_categories(tx, product.uuid, &product.categories)
            .await?;

        self.get_product(tx, product.uuid).await
    }

    /// Returns `None` when no product has the given UUID.
    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        let rows_affected = query(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&update.name)
            .bind(&update.slug)
            .bind(&update.description)
            .bind(to_i64(update.price, "price")?)
            .bind(to_i64(update.stock, "stock")?)
            .bind(update.status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(None);
        }

        query(CLEAR_PRODUCT_CATEGORIES_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        self.assign_categories(tx, product, &update.categories)
            .await?;

        self.get_product(tx, product).await.map(Some)
    }

    async fn assign_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        categories: &[CategoryUuid],
    ) -> Result<(), sqlx::Error> {
        if categories.is_empty() {
            return Ok(());
        }

        let categories: Vec<Uuid> = categories
            .iter()
            .copied()
            .map(CategoryUuid::into_uuid)
            .collect();

        query(ASSIGN_PRODUCT_CATEGORIES_SQL)
            .bind(product.into_uuid())
            .bind(categories)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let categories: Vec<Uuid> = row.try_get("categories")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            price: from_i64(row.try_get("price")?, "price")?,
            stock: from_i64(row.try_get("stock")?, "stock")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            categories: categories.into_iter().map(CategoryUuid::from_uuid).collect(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
