//! Discounts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        access::{self, Principal},
        discounts::{
            data::NewDiscount,
            errors::DiscountsServiceError,
            records::{DiscountKind, DiscountRecord},
            repository::PgDiscountsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgDiscountsService {
    db: Db,
    repository: PgDiscountsRepository,
}

impl PgDiscountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDiscountsRepository::new(),
        }
    }
}

#[async_trait]
impl DiscountsService for PgDiscountsService {
    #[tracing::instrument(
        name = "discounts.service.create_discount",
        skip(self, principal, discount),
        fields(
            discount_uuid = %discount.uuid,
            kind = %discount.kind,
            value = discount.value,
            max_uses = discount.max_uses
        ),
        err
    )]
    async fn create_discount(
        &self,
        principal: Principal,
        discount: NewDiscount,
    ) -> Result<DiscountRecord, DiscountsServiceError> {
        if access::admin_only(Some(&principal)).is_denied() {
            return Err(DiscountsServiceError::Forbidden);
        }

        if discount.code.trim().is_empty()
            || (discount.kind == DiscountKind::Percentage && discount.value > 100)
        {
            return Err(DiscountsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_discount(&mut tx, discount).await?;

        tx.commit().await?;

        info!(discount_uuid = %created.uuid, code = %created.code, "created discount");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// Creates a discount code. Admin only.
    async fn create_discount(
        &self,
        principal: Principal,
        discount: NewDiscount,
    ) -> Result<DiscountRecord, DiscountsServiceError>;
}
