use crate::{
    entities::{full_sheet_quotation, product_price, thickness},
    errors::ServiceError,
    services::{
        cascade,
        money::{round_money, within_money_range},
        product::BulkDeleteResult,
        CrudService,
    },
};
use async_trait::async_trait;
use rust_decimal::Decimal;
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
pub struct ThicknessInput {
    #[schema(value_type = Option<f64>, example = 2.5)]
    pub thickness: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThicknessDto {
    pub id: i32,
    #[schema(value_type = String, example = "2.50")]
    pub thickness: Decimal,
    #[schema(example = "2.5mm")]
    pub thickness_name: String,
}

impl From<thickness::Model> for ThicknessDto {
    fn from(model: thickness::Model) -> Self {
        Self {
            thickness_name: model.display_name(),
            thickness: round_money(model.thickness),
            id: model.id,
        }
    }
}

fn checked_value(input: &ThicknessInput) -> Result<Decimal, ServiceError> {
    match input.thickness {
        Some(value) if value > Decimal::ZERO && within_money_range(round_money(value)) => {
            Ok(round_money(value))
        }
        _ => Err(ServiceError::validation("Valid thickness value is required")),
    }
}

pub(crate) async fn find_thickness<C>(conn: &C, id: i32) -> Result<thickness::Model, ServiceError>
where
    C: ConnectionTrait,
{
    thickness::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Thickness", id))
}

#[derive(Clone)]
pub struct ThicknessService {
    db: Arc<DatabaseConnection>,
}

impl ThicknessService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_value_free<C>(
        conn: &C,
        value: Decimal,
        except_id: Option<i32>,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = thickness::Entity::find().filter(thickness::Column::Thickness.eq(value));
        if let Some(id) = except_id {
            query = query.filter(thickness::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(ServiceError::Conflict(
                "Thickness with this value already exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn is_referenced<C>(conn: &C, id: i32) -> Result<bool, ServiceError>
    where
        C: ConnectionTrait,
    {
        let prices = product_price::Entity::find()
            .filter(product_price::Column::ThicknessId.eq(id))
            .count(conn)
            .await?;
        let quotations = full_sheet_quotation::Entity::find()
            .filter(full_sheet_quotation::Column::ThicknessId.eq(id))
            .count(conn)
            .await?;
        Ok(prices + quotations > 0)
    }

    /// Removes every thickness together with all prices, cart lines and
    /// quotations that depend on one.
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<BulkDeleteResult, ServiceError> {
        let txn = self.db.begin().await?;
        let ids = thickness::Entity::find()
            .select_only()
            .column(thickness::Column::Id)
            .into_tuple::<i32>()
            .all(&txn)
            .await?;
        for id in &ids {
            cascade::purge_thickness(&txn, *id).await?;
        }
        let remaining = thickness::Entity::find().count(&txn).await?;
        txn.commit().await?;

        info!(deleted = ids.len(), "Deleted all thicknesses");
        Ok(BulkDeleteResult {
            deleted_count: ids.len() as u64,
            remaining_count: remaining,
        })
    }
}

#[async_trait]
impl CrudService for ThicknessService {
    type Dto = ThicknessDto;
    type Create = ThicknessInput;
    type Update = ThicknessInput;

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<ThicknessDto, ServiceError> {
        Ok(find_thickness(&*self.db, id).await?.into())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<ThicknessDto>, ServiceError> {
        let rows = thickness::Entity::find()
            .order_by_asc(thickness::Column::Thickness)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(ThicknessDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, input: ThicknessInput) -> Result<ThicknessDto, ServiceError> {
        let value = checked_value(&input)?;

        let txn = self.db.begin().await?;
        Self::ensure_value_free(&txn, value, None).await?;
        let created = thickness::ActiveModel {
            thickness: Set(value),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(thickness_id = created.id, %value, "Created thickness");
        Ok(created.into())
    }

    /// Only unreferenced rows may change value; quotations snapshot it.
    #[instrument(skip(self))]
    async fn update(&self, id: i32, input: ThicknessInput) -> Result<ThicknessDto, ServiceError> {
        let value = checked_value(&input)?;

        let txn = self.db.begin().await?;
        let existing = find_thickness(&txn, id).await?;
        if Self::is_referenced(&txn, id).await? {
            return Err(ServiceError::Conflict(
                "Thickness is referenced by prices or quotations and cannot be changed"
                    .to_string(),
            ));
        }
        Self::ensure_value_free(&txn, value, Some(id)).await?;
        let mut active: thickness::ActiveModel = existing.into();
        active.thickness = Set(value);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(thickness_id = id, %value, "Updated thickness");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_thickness(&txn, id).await?;
        let report = cascade::purge_thickness(&txn, id).await?;
        txn.commit().await?;

        info!(thickness_id = id, ?report, "Deleted thickness");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_missing_and_non_positive_values() {
        for input in [None, Some(dec!(0)), Some(dec!(-1.5))] {
            let err = checked_value(&ThicknessInput { thickness: input }).unwrap_err();
            assert_eq!(err.to_string(), "Valid thickness value is required");
        }
    }

    #[test]
    fn dto_carries_display_name() {
        let dto = ThicknessDto::from(thickness::Model {
            id: 1,
            thickness: dec!(2.5),
        });
        assert_eq!(dto.thickness_name, "2.5mm");
        assert_eq!(dto.thickness.to_string(), "2.50");
    }
}
