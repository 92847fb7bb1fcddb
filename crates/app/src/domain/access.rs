//! Access rules.
//!
//! Every rule takes the (possibly anonymous) caller and yields a [`Scope`]
//! describing which records the caller may touch. Services evaluate the scope
//! against the record's owner or publication status instead of re-deriving the
//! rule inline.

use serde::{Deserialize, Serialize};

use crate::domain::{
    products::records::ProductStatus,
    users::records::{Role, UserUuid},
};

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub user: UserUuid,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub fn new(user: UserUuid, role: Role) -> Self {
        Self { user, role }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The records a caller may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every record.
    All,

    /// Only records owned by this user.
    Owner(UserUuid),

    /// Only published catalog records.
    Published,

    /// Nothing.
    Denied,
}

impl Scope {
    #[must_use]
    pub fn is_denied(self) -> bool {
        self == Self::Denied
    }

    /// Whether a record owned by `owner` falls inside the scope.
    #[must_use]
    pub fn permits_owner(self, owner: UserUuid) -> bool {
        match self {
            Self::All => true,
            Self::Owner(user) => user == owner,
            Self::Published | Self::Denied => false,
        }
    }

    /// Whether a product with `status` falls inside the scope.
    #[must_use]
    pub fn permits_status(self, status: ProductStatus) -> bool {
        match self {
            Self::All => true,
            Self::Published => status == ProductStatus::Published,
            Self::Owner(_) | Self::Denied => false,
        }
    }
}

/// Admins see everything, users see their own records, anonymous callers nothing.
#[must_use]
pub fn owner_or_admin(principal: Option<&Principal>) -> Scope {
    match principal {
        Some(principal) if principal.is_admin() => Scope::All,
        Some(principal) => Scope::Owner(principal.user),
        None => Scope::Denied,
    }
}

#[must_use]
pub fn admin_only(principal: Option<&Principal>) -> Scope {
    match principal {
        Some(principal) if principal.is_admin() => Scope::All,
        _ => Scope::Denied,
    }
}

#[must_use]
pub fn authenticated(principal: Option<&Principal>) -> Scope {
    match principal {
        Some(_) => Scope::All,
        None => Scope::Denied,
    }
}

/// Admins see drafts too; everyone else only sees published products.
#[must_use]
pub fn product_visibility(principal: Option<&Principal>) -> Scope {
    match principal {
        Some(principal) if principal.is_admin() => Scope::All,
        _ => Scope::Published,
    }
}
