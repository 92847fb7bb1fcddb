//! Notification Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::notifications::records::NotificationRecord;

use crate::{extensions::*, notifications::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    pub uuid: Uuid,
    pub message: String,

    /// `order_placed` or `status_update`
    pub kind: String,
    pub created_at: String,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(notification: NotificationRecord) -> Self {
        Self {
            uuid: notification.uuid.into_uuid(),
            message: notification.message,
            kind: notification.kind.to_string(),
            created_at: notification.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationsResponse {
    /// The latest notifications, newest first
    pub notifications: Vec<NotificationResponse>,
}

/// Notification Index Handler
#[endpoint(
    tags("notifications"),
    summary = "List Notifications",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<NotificationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let notifications = state
        .app
        .notifications
        .list_notifications(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(NotificationsResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::notifications::records::{NotificationKind, NotificationUuid};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER, service};

    use super::*;

    #[tokio::test]
    async fn test_lists_callers_notifications() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .notifications
            .expect_list_notifications()
            .once()
            .withf(|principal| *principal == TEST_USER)
            .return_once(|principal| {
                Ok(vec![NotificationRecord {
                    uuid: NotificationUuid::new(),
                    user_uuid: principal.user,
                    message: "Your order has been placed".to_string(),
                    kind: NotificationKind::OrderPlaced,
                    created_at: Timestamp::UNIX_EPOCH,
                }])
            });

        let mut res = TestClient::get("http://example.com/notifications")
            .send(&service(
                mocks,
                Some(TEST_USER),
                Router::with_path("notifications").get(handler),
            ))
            .await;

        let body: NotificationsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.notifications.first().map(|n| n.kind.as_str()),
            Some("order_placed")
        );

        Ok(())
    }
}
