//! Notification Data

use crate::domain::{
    notifications::records::{NotificationKind, NotificationUuid},
    users::records::UserUuid,
};

/// How many notifications a listing returns.
pub const NOTIFICATION_LIST_LIMIT: u32 = 50;

/// New Notification Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub uuid: NotificationUuid,
    pub user_uuid: UserUuid,
    pub message: String,
    pub kind: NotificationKind,
}
