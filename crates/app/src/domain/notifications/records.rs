//! Notification Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Notification UUID
pub type NotificationUuid = TypedUuid<NotificationRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderPlaced,
    StatusUpdate,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderPlaced => "order_placed",
            Self::StatusUpdate => "status_update",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(String);

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order_placed" => Ok(Self::OrderPlaced),
            "status_update" => Ok(Self::StatusUpdate),
            other => Err(UnknownNotificationKind(other.to_string())),
        }
    }
}

/// Notification Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub uuid: NotificationUuid,
    pub user_uuid: UserUuid,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Timestamp,
}
