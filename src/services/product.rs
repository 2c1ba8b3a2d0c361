use crate::{
    entities::product,
    errors::ServiceError,
    services::{validation::not_blank, CrudService},
};
use async_trait::async_trait;
use metrics::counter;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 255), custom = "not_blank")]
    pub product_name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255), custom = "not_blank")]
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub product_name: String,
    pub description: Option<String>,
    pub category_name: String,
}

impl From<product::Model> for ProductDto {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            product_name: model.product_name,
            description: model.description,
            category_name: model.category_name,
        }
    }
}

/// Count of rows removed by a bulk delete and of rows left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub deleted_count: u64,
    pub remaining_count: u64,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn lowered(column: product::Column) -> Expr {
        Expr::expr(Func::lower(Expr::col(column)))
    }

    /// Exact match on the free-text category name, ignoring case.
    #[instrument(skip(self))]
    pub async fn by_category_name(&self, name: &str) -> Result<Vec<ProductDto>, ServiceError> {
        let needle = name.trim().to_lowercase();
        let products = product::Entity::find()
            .filter(Self::lowered(product::Column::CategoryName).eq(needle))
            .order_by_asc(product::Column::ProductName)
            .all(&*self.db)
            .await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> Result<Vec<ProductDto>, ServiceError> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ServiceError::validation("Search term is required"));
        }
        let products = product::Entity::find()
            .filter(Self::lowered(product::Column::ProductName).like(format!("%{}%", needle)))
            .order_by_asc(product::Column::ProductName)
            .all(&*self.db)
            .await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<BulkDeleteResult, ServiceError> {
        let txn = self.db.begin().await?;
        let deleted = product::Entity::delete_many().exec(&txn).await?.rows_affected;
        let remaining = product::Entity::find().count(&txn).await?;
        txn.commit().await?;

        info!(deleted, "Deleted all products");
        Ok(BulkDeleteResult {
            deleted_count: deleted,
            remaining_count: remaining,
        })
    }

    async fn find(&self, id: i32) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }
}

#[async_trait]
impl CrudService for ProductService {
    type Dto = ProductDto;
    type Create = ProductInput;
    type Update = ProductInput;

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<ProductDto, ServiceError> {
        Ok(self.find(id).await?.into())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<ProductDto>, ServiceError> {
        let products = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: ProductInput) -> Result<ProductDto, ServiceError> {
        input.validate()?;
        let created = product::ActiveModel {
            product_name: Set(input.product_name.trim().to_string()),
            description: Set(input.description),
            category_name: Set(input.category_name.trim().to_string()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        counter!("plastics.products.created", 1);
        info!(product_id = created.id, "Created product");
        Ok(created.into())
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: i32, input: ProductInput) -> Result<ProductDto, ServiceError> {
        input.validate()?;
        let mut active: product::ActiveModel = self.find(id).await?.into();
        active.product_name = Set(input.product_name.trim().to_string());
        active.description = Set(input.description);
        active.category_name = Set(input.category_name.trim().to_string());
        let updated = active.update(&*self.db).await?;

        info!(product_id = id, "Updated product");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = product::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Product", id));
        }
        info!(product_id = id, "Deleted product");
        Ok(())
    }
}
