//! Order Data

use crate::domain::{
    discounts::records::DiscountUuid,
    orders::{
        pricing::OrderTotals,
        records::{OrderItemRecord, OrderRecord, OrderUuid, PaymentMethod, ShippingAddress},
    },
    users::records::UserUuid,
};

/// Largest page size for order listings.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub payment_method: PaymentMethod,
    pub discount_code: Option<String>,
    pub coins_to_use: u64,
    pub shipping_address: ShippingAddress,
}

/// A priced order ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItemRecord>,
    pub totals: OrderTotals,
    pub discount_uuid: Option<DiscountUuid>,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
}

/// One-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a page request, defaulting missing values. Returns `None` when
    /// `page` is zero or `limit` is outside `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Option<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        if page == 0 || !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return None;
        }

        Some(Self { page, limit })
    }

    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// A page of orders plus the caller's total order count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPage {
    pub orders: Vec<OrderRecord>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_requests_default_to_first_page() {
        assert_eq!(PageRequest::new(None, None), Some(PageRequest::default()));
    }

    #[test]
    fn page_zero_is_rejected() {
        assert_eq!(PageRequest::new(Some(0), None), None);
    }

    #[test]
    fn limits_outside_range_are_rejected() {
        assert_eq!(PageRequest::new(None, Some(0)), None);
        assert_eq!(PageRequest::new(None, Some(101)), None);
        assert!(PageRequest::new(None, Some(100)).is_some());
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = PageRequest { page: 3, limit: 10 };

        assert_eq!(page.offset(), 20);
    }
}
