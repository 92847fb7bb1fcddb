//! Discounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{from_i64, to_i64},
    domain::discounts::{
        data::NewDiscount,
        records::{DiscountRecord, DiscountUuid},
    },
};

const CREATE_DISCOUNT_SQL: &str = include_str!("sql/create_discount.sql");
const LOCK_DISCOUNT_BY_CODE_SQL: &str = include_str!("sql/lock_discount_by_code.sql");
const REDEEM_DISCOUNT_SQL: &str = include_str!("sql/redeem_discount.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDiscountsRepository;

impl PgDiscountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: NewDiscount,
    ) -> Result<DiscountRecord, sqlx::Error> {
        query_as::<Postgres, DiscountRecord>(CREATE_DISCOUNT_SQL)
            .bind(discount.uuid.into_uuid())
            .bind(discount.code)
            .bind(discount.kind.as_str())
            .bind(to_i64(discount.value, "value")?)
            .bind(SqlxTimestamp::from(discount.expires_at))
            .bind(to_i64(discount.max_uses, "max_uses")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Exact, case-sensitive code lookup holding a row lock until the transaction ends.
    pub(crate) async fn lock_discount_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<DiscountRecord>, sqlx::Error> {
        query_as::<Postgres, DiscountRecord>(LOCK_DISCOUNT_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Consume one use. Returns `false` when no uses remain.
    pub(crate) async fn redeem_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: DiscountUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(REDEEM_DISCOUNT_SQL)
            .bind(discount.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}

impl<'r> FromRow<'r, PgRow> for DiscountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        Ok(Self {
            uuid: DiscountUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            kind: kind.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?,
            value: from_i64(row.try_get("value")?, "value")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            max_uses: from_i64(row.try_get("max_uses")?, "max_uses")?,
            used_count: from_i64(row.try_get("used_count")?, "used_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
