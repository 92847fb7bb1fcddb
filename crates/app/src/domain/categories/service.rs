//! Categories service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        access::{self, Principal},
        categories::{
            data::NewCategory, errors::CategoriesServiceError, records::CategoryRecord,
            repository::PgCategoriesRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
        }
    }
}

#[async_trait]
impl CategoriesService for PgCategoriesService {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    #[tracing::instrument(
        name = "categories.service.create_category",
        skip(self, principal, category),
        fields(category_uuid = %category.uuid, slug = %category.slug),
        err
    )]
    async fn create_category(
        &self,
        principal: Principal,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        if access::admin_only(Some(&principal)).is_denied() {
            return Err(CategoriesServiceError::Forbidden);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_category(&mut tx, category).await?;

        tx.commit().await?;

        info!(category_uuid = %created.uuid, "created category");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// All categories, alphabetically.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError>;

    /// Creates a category. Admin only.
    async fn create_category(
        &self,
        principal: Principal,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError>;
}
