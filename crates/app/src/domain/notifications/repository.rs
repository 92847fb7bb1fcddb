//! Notifications Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    notifications::{
        data::NewNotification,
        records::{NotificationRecord, NotificationUuid},
    },
    users::records::UserUuid,
};

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");
const LIST_NOTIFICATIONS_SQL: &str = include_str!("sql/list_notifications.sql");
const GET_NOTIFICATION_SQL: &str = include_str!("sql/get_notification.sql");
const DELETE_NOTIFICATION_SQL: &str = include_str!("sql/delete_notification.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NewNotification,
    ) -> Result<NotificationRecord, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(CREATE_NOTIFICATION_SQL)
            .bind(notification.uuid.into_uuid())
            .bind(notification.user_uuid.into_uuid())
            .bind(notification.message)
            .bind(notification.kind.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_notifications(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(LIST_NOTIFICATIONS_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
    ) -> Result<NotificationRecord, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(GET_NOTIFICATION_SQL)
            .bind(notification.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_NOTIFICATION_SQL)
            .bind(notification.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for NotificationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            message: row.try_get("message")?,
            kind: kind.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
