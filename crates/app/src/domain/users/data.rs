//! User Data

use crate::domain::users::records::{Role, UserRecord, UserUuid};

/// Data required to insert a user row. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A user's profile: the account plus how many orders they have placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: UserRecord,
    pub order_count: u64,
}
