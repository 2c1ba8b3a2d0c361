use crate::{
    entities::{full_sheet_quotation, product_price, size},
    errors::ServiceError,
    services::{cascade, product::BulkDeleteResult, CrudService},
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeInput {
    pub length: Option<i32>,
    pub breadth: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeDto {
    pub id: i32,
    pub length: i32,
    pub breadth: i32,
    #[schema(example = "2440x1220")]
    pub size_name: String,
}

impl From<size::Model> for SizeDto {
    fn from(model: size::Model) -> Self {
        Self {
            size_name: model.display_name(),
            id: model.id,
            length: model.length,
            breadth: model.breadth,
        }
    }
}

fn checked_dimensions(input: &SizeInput) -> Result<(i32, i32), ServiceError> {
    match (input.length, input.breadth) {
        (Some(length), Some(breadth)) if length > 0 && breadth > 0 => Ok((length, breadth)),
        _ => Err(ServiceError::validation(
            "Valid length and breadth are required",
        )),
    }
}

pub(crate) async fn find_size<C>(conn: &C, id: i32) -> Result<size::Model, ServiceError>
where
    C: ConnectionTrait,
{
    size::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Size", id))
}

#[derive(Clone)]
pub struct SizeService {
    db: Arc<DatabaseConnection>,
}

impl SizeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_pair_free<C>(
        conn: &C,
        (length, breadth): (i32, i32),
        except_id: Option<i32>,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = size::Entity::find()
            .filter(size::Column::Length.eq(length))
            .filter(size::Column::Breadth.eq(breadth));
        if let Some(id) = except_id {
            query = query.filter(size::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(ServiceError::Conflict(
                "Size with these dimensions already exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn is_referenced<C>(conn: &C, id: i32) -> Result<bool, ServiceError>
    where
        C: ConnectionTrait,
    {
        let prices = product_price::Entity::find()
            .filter(product_price::Column::SizeId.eq(id))
            .count(conn)
            .await?;
        let quotations = full_sheet_quotation::Entity::find()
            .filter(full_sheet_quotation::Column::SizeId.eq(id))
            .count(conn)
            .await?;
        Ok(prices + quotations > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<BulkDeleteResult, ServiceError> {
        let txn = self.db.begin().await?;
        let ids = size::Entity::find()
            .select_only()
            .column(size::Column::Id)
            .into_tuple::<i32>()
            .all(&txn)
            .await?;
        for id in &ids {
            cascade::purge_size(&txn, *id).await?;
        }
        let remaining = size::Entity::find().count(&txn).await?;
        txn.commit().await?;

        info!(deleted = ids.len(), "Deleted all sizes");
        Ok(BulkDeleteResult {
            deleted_count: ids.len() as u64,
            remaining_count: remaining,
        })
    }
}

#[async_trait]
impl CrudService for SizeService {
    type Dto = SizeDto;
    type Create = SizeInput;
    type Update = SizeInput;

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<SizeDto, ServiceError> {
        Ok(find_size(&*self.db, id).await?.into())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<SizeDto>, ServiceError> {
        let rows = size::Entity::find()
            .order_by_asc(size::Column::Length)
            .order_by_asc(size::Column::Breadth)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(SizeDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, input: SizeInput) -> Result<SizeDto, ServiceError> {
        let (length, breadth) = checked_dimensions(&input)?;

        let txn = self.db.begin().await?;
        Self::ensure_pair_free(&txn, (length, breadth), None).await?;
        let created = size::ActiveModel {
            length: Set(length),
            breadth: Set(breadth),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(size_id = created.id, length, breadth, "Created size");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    async fn update(&self, id: i32, input: SizeInput) -> Result<SizeDto, ServiceError> {
        let (length, breadth) = checked_dimensions(&input)?;

        let txn = self.db.begin().await?;
        let existing = find_size(&txn, id).await?;
        if Self::is_referenced(&txn, id).await? {
            return Err(ServiceError::Conflict(
                "Size is referenced by prices or quotations and cannot be changed".to_string(),
            ));
        }
        Self::ensure_pair_free(&txn, (length, breadth), Some(id)).await?;
        let mut active: size::ActiveModel = existing.into();
        active.length = Set(length);
        active.breadth = Set(breadth);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(size_id = id, length, breadth, "Updated size");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_size(&txn, id).await?;
        let report = cascade::purge_size(&txn, id).await?;
        txn.commit().await?;

        info!(size_id = id, ?report, "Deleted size");
        Ok(())
    }
}
