//! Auth data models.

use jiff::{SignedDuration, Timestamp};

use crate::{
    auth::SessionTokenVersion,
    domain::{
        access::Principal,
        users::records::{Role, UserRecord, UserUuid},
    },
    uuids::TypedUuid,
};

/// Session UUID
pub type SessionUuid = TypedUuid<SessionRecord>;

/// Sessions last this many days unless configured otherwise.
pub const DEFAULT_SESSION_TTL_DAYS: u32 = 30;

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub user_uuid: UserUuid,
    pub role: Role,

    /// Token format/hash version.
    pub version: SessionTokenVersion,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Login result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: SessionRecord,
    pub user: UserRecord,
}

/// Email and password as submitted by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// An account to register with an explicit role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub credentials: Credentials,
    pub role: Role,
}

/// The result of a successful bearer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated {
    pub principal: Principal,
    pub session: SessionUuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    pub session_ttl: SignedDuration,
}

impl AuthSettings {
    #[must_use]
    pub fn with_ttl_days(days: u32) -> Self {
        Self {
            session_ttl: SignedDuration::from_hours(i64::from(days) * 24),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self::with_ttl_days(DEFAULT_SESSION_TTL_DAYS)
    }
}
