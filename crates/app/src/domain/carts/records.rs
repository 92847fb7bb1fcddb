//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductRecord, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// `updated_at` moves on every mutation, so clients can use it to detect a
/// stale copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A cart entry with its product expanded at current values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub product: ProductRecord,
    pub quantity: u32,
}
