//! Products Data

use crate::domain::{
    categories::records::CategoryUuid,
    products::records::{ProductStatus, ProductUuid},
};

/// Largest page the catalog listing will return.
pub const MAX_PRODUCT_LIMIT: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 20;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
    pub status: ProductStatus,
    pub categories: Vec<CategoryUuid>,
}

/// Product Update Data. Replaces every editable field, including categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
    pub status: ProductStatus,
    pub categories: Vec<CategoryUuid>,
}

/// Catalog listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category slug.
    pub category: Option<String>,

    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,

    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Requested limit, defaulted and clamped to `1..=MAX_PRODUCT_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PRODUCT_LIMIT)
            .clamp(1, MAX_PRODUCT_LIMIT)
    }
}
