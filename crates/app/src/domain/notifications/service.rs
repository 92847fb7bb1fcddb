//! Notifications service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        access::{self, Principal},
        notifications::{
            data::NOTIFICATION_LIST_LIMIT,
            errors::NotificationsServiceError,
            records::{NotificationRecord, NotificationUuid},
            repository::PgNotificationsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgNotificationsService {
    db: Db,
    repository: PgNotificationsRepository,
}

impl PgNotificationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgNotificationsRepository::new(),
        }
    }
}

#[async_trait]
impl NotificationsService for PgNotificationsService {
    #[tracing::instrument(
        name = "notifications.service.list_notifications",
        skip(self, principal),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn list_notifications(
        &self,
        principal: Principal,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let notifications = self
            .repository
            .list_notifications(&mut tx, principal.user, NOTIFICATION_LIST_LIMIT)
            .await?;

        tx.commit().await?;

        Ok(notifications)
    }

    #[tracing::instrument(
        name = "notifications.service.delete_notification",
        skip(self, principal),
        fields(user_uuid = %principal.user, notification_uuid = %notification),
        err
    )]
    async fn delete_notification(
        &self,
        principal: Principal,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let existing = self
            .repository
            .get_notification(&mut tx, notification)
            .await?;

        if !access::owner_or_admin(Some(&principal)).permits_owner(existing.user_uuid) {
            return Err(NotificationsServiceError::NotFound);
        }

        let rows_affected = self
            .repository
            .delete_notification(&mut tx, notification)
            .await?;

        if rows_affected == 0 {
            return Err(NotificationsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(notification_uuid = %notification, "deleted notification");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// The caller's most recent notifications, newest first.
    async fn list_notifications(
        &self,
        principal: Principal,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError>;

    /// Deletes a notification the caller owns. Admins may delete any.
    async fn delete_notification(
        &self,
        principal: Principal,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError>;
}
