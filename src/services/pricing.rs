//! The pricing matrix: one unit price per (series, thickness, size) triple.

use crate::{
    entities::{product_detail, product_price, size, thickness},
    errors::ServiceError,
    services::{
        cascade,
        grade::find_grade,
        money::{round_money, within_money_range},
        product::BulkDeleteResult,
        product_detail::find_detail,
        size::find_size,
        thickness::find_thickness,
    },
};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceInput {
    pub product_detail_id: i32,
    pub thickness_id: i32,
    pub size_id: i32,
    #[schema(value_type = Option<f64>, example = 1450.0)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceInput {
    #[schema(value_type = Option<f64>, example = 1500.0)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub id: i32,
    pub product_detail_id: i32,
    pub thickness_id: i32,
    pub size_id: i32,
    #[schema(value_type = String, example = "1450.00")]
    pub price: Decimal,
    #[schema(example = "2.5mm")]
    pub thickness_name: String,
    pub length: i32,
    pub breadth: i32,
}

impl PriceDto {
    pub fn new(price: product_price::Model, t: &thickness::Model, s: &size::Model) -> Self {
        Self {
            id: price.id,
            product_detail_id: price.product_detail_id,
            thickness_id: price.thickness_id,
            size_id: price.size_id,
            price: round_money(price.price),
            thickness_name: t.display_name(),
            length: s.length,
            breadth: s.breadth,
        }
    }
}

fn checked_price(price: Option<Decimal>) -> Result<Decimal, ServiceError> {
    match price {
        Some(value) if value > Decimal::ZERO => {
            let price = round_money(value);
            if !within_money_range(price) {
                return Err(ServiceError::validation("Price must not exceed 99999999.99"));
            }
            Ok(price)
        }
        _ => Err(ServiceError::validation("Price must be greater than 0")),
    }
}

/// Joins thickness and size display data onto a batch of prices.
pub(crate) async fn price_dtos<C>(
    conn: &C,
    prices: Vec<product_price::Model>,
) -> Result<Vec<PriceDto>, ServiceError>
where
    C: ConnectionTrait,
{
    if prices.is_empty() {
        return Ok(Vec::new());
    }
    let thickness_ids: Vec<i32> = prices.iter().map(|p| p.thickness_id).collect();
    let size_ids: Vec<i32> = prices.iter().map(|p| p.size_id).collect();

    let thicknesses: HashMap<i32, thickness::Model> = thickness::Entity::find()
        .filter(thickness::Column::Id.is_in(thickness_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let sizes: HashMap<i32, size::Model> = size::Entity::find()
        .filter(size::Column::Id.is_in(size_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    prices
        .into_iter()
        .map(|p| {
            let t = thicknesses
                .get(&p.thickness_id)
                .ok_or_else(|| ServiceError::not_found("Thickness", p.thickness_id))?;
            let s = sizes
                .get(&p.size_id)
                .ok_or_else(|| ServiceError::not_found("Size", p.size_id))?;
            Ok(PriceDto::new(p, t, s))
        })
        .collect()
}

pub(crate) async fn find_price<C>(conn: &C, id: i32) -> Result<product_price::Model, ServiceError>
where
    C: ConnectionTrait,
{
    product_price::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Price", id))
}

#[derive(Clone)]
pub struct PricingService {
    db: Arc<DatabaseConnection>,
}

impl PricingService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Adds a cell to the matrix. The triple must not already be priced.
    #[instrument(skip(self))]
    pub async fn create_price(&self, input: CreatePriceInput) -> Result<PriceDto, ServiceError> {
        let price = checked_price(input.price)?;

        let txn = self.db.begin().await?;
        let detail = find_detail(&txn, input.product_detail_id).await?;
        let t = find_thickness(&txn, input.thickness_id).await?;
        let s = find_size(&txn, input.size_id).await?;

        let existing = product_price::Entity::find()
            .filter(product_price::Column::ProductDetailId.eq(detail.id))
            .filter(product_price::Column::ThicknessId.eq(t.id))
            .filter(product_price::Column::SizeId.eq(s.id))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(ServiceError::Conflict(format!(
                "Combination of Product Detail, Thickness '{}', and Size '{}' already exists",
                t.thickness.normalize(),
                s.display_name()
            )));
        }

        let created = product_price::ActiveModel {
            product_detail_id: Set(detail.id),
            thickness_id: Set(t.id),
            size_id: Set(s.id),
            price: Set(price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        counter!("plastics.prices.created", 1);
        info!(price_id = created.id, product_detail_id = detail.id, "Created price");
        Ok(PriceDto::new(created, &t, &s))
    }

    #[instrument(skip(self))]
    pub async fn prices_by_grade(&self, grade_id: i32) -> Result<Vec<PriceDto>, ServiceError> {
        let db = &*self.db;
        find_grade(db, grade_id).await?;
        let detail_ids = product_detail::Entity::find()
            .select_only()
            .column(product_detail::Column::Id)
            .filter(product_detail::Column::GradeId.eq(grade_id))
            .into_tuple::<i32>()
            .all(db)
            .await?;
        let prices = product_price::Entity::find()
            .filter(product_price::Column::ProductDetailId.is_in(detail_ids))
            .order_by_asc(product_price::Column::Id)
            .all(db)
            .await?;
        price_dtos(db, prices).await
    }

    /// Only the amount is mutable; the triple is fixed at creation.
    #[instrument(skip(self))]
    pub async fn update_price(
        &self,
        id: i32,
        input: UpdatePriceInput,
    ) -> Result<PriceDto, ServiceError> {
        let price = checked_price(input.price)?;

        let txn = self.db.begin().await?;
        let existing = find_price(&txn, id).await?;
        let t = find_thickness(&txn, existing.thickness_id).await?;
        let s = find_size(&txn, existing.size_id).await?;
        let mut active: product_price::ActiveModel = existing.into();
        active.price = Set(price);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(price_id = id, %price, "Updated price");
        Ok(PriceDto::new(updated, &t, &s))
    }

    #[instrument(skip(self))]
    pub async fn delete_price(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_price(&txn, id).await?;
        let report = cascade::purge_prices(&txn, &[id]).await?;
        txn.commit().await?;

        info!(price_id = id, ?report, "Deleted price");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<BulkDeleteResult, ServiceError> {
        let txn = self.db.begin().await?;
        let report = cascade::purge_all_prices(&txn).await?;
        let remaining = product_price::Entity::find().count(&txn).await?;
        txn.commit().await?;

        info!(?report, "Deleted all prices");
        Ok(BulkDeleteResult {
            deleted_count: report.prices,
            remaining_count: remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_must_be_positive() {
        assert!(checked_price(None).is_err());
        assert!(checked_price(Some(dec!(0))).is_err());
        assert_eq!(checked_price(Some(dec!(12.5))).unwrap().to_string(), "12.50");
        assert!(checked_price(Some(dec!(100000000000000000000))).is_err());
    }

    #[test]
    fn dto_joins_display_fields() {
        let dto = PriceDto::new(
            product_price::Model {
                id: 9,
                product_detail_id: 2,
                thickness_id: 3,
                size_id: 4,
                price: dec!(100),
            },
            &thickness::Model {
                id: 3,
                thickness: dec!(2.50),
            },
            &size::Model {
                id: 4,
                length: 100,
                breadth: 200,
            },
        );
        assert_eq!(dto.thickness_name, "2.5mm");
        assert_eq!((dto.length, dto.breadth), (100, 200));
        assert_eq!(dto.price.to_string(), "100.00");
    }
}
