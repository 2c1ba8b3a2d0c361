//! Full-sheet and cut-to-size quotations.
//!
//! Figures are accepted as supplied and only checked for presence and sign;
//! the service verifies that every referenced catalog row exists and then
//! stores a write-once snapshot.

use crate::{
    entities::{cut_to_size_quotation, full_sheet_quotation, grade, product_detail, product_price},
    errors::ServiceError,
    services::{
        money::round_money,
        product_detail::find_detail,
        size::find_size,
        thickness::find_thickness,
        validation::{non_negative_decimal, not_blank, positive_decimal},
    },
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullSheetQuotationRequest {
    #[validate(custom = "not_blank")]
    pub series: String,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64, example = 6.0)]
    pub thickness: Decimal,
    #[validate(custom = "not_blank")]
    #[schema(example = "2440x1220")]
    pub size: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub base_price: Decimal,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub product_detail_id: i32,
    pub thickness_id: i32,
    pub size_id: i32,
    pub product_price_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CutToSizeQuotationRequest {
    #[validate(custom = "not_blank")]
    pub series: String,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub thickness: Decimal,
    #[validate(custom = "not_blank")]
    pub size_full_sheet: String,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub cut_length: Decimal,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub cut_width: Decimal,
    #[validate(custom = "non_negative_decimal")]
    #[schema(value_type = f64)]
    pub machining_cost: Decimal,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub cut_size_area: Decimal,
    #[validate(range(min = 1))]
    pub quantity_per_sheet: i32,
    #[validate(range(min = 1))]
    pub num_full_sheets_required: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub base_price_full_sheet: Decimal,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub cut_to_size_price_per_unit: Decimal,
    #[validate(custom = "positive_decimal")]
    #[schema(value_type = f64)]
    pub total_calculated_price: Decimal,
    pub product_detail_id: i32,
    pub product_price_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullSheetQuotationDto {
    pub id: i32,
    pub series: String,
    #[schema(value_type = String)]
    pub thickness: Decimal,
    pub size: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub base_price: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub grade_name: String,
}

impl FullSheetQuotationDto {
    fn new(model: full_sheet_quotation::Model, grade_name: String) -> Self {
        Self {
            id: model.id,
            series: model.series,
            thickness: round_money(model.thickness),
            size: model.size,
            quantity: model.quantity,
            base_price: round_money(model.base_price),
            total_price: round_money(model.total_price),
            created_at: model.created_at,
            grade_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CutToSizeQuotationDto {
    pub id: i32,
    pub series: String,
    #[schema(value_type = String)]
    pub thickness: Decimal,
    pub size_full_sheet: String,
    #[schema(value_type = String)]
    pub cut_length: Decimal,
    #[schema(value_type = String)]
    pub cut_width: Decimal,
    #[schema(value_type = String)]
    pub machining_cost: Decimal,
    #[schema(value_type = String)]
    pub cut_size_area: Decimal,
    pub quantity_per_sheet: i32,
    pub num_full_sheets_required: i32,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub base_price_full_sheet: Decimal,
    #[schema(value_type = String)]
    pub cut_to_size_price_per_unit: Decimal,
    #[schema(value_type = String)]
    pub total_calculated_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub grade_name: String,
}

impl CutToSizeQuotationDto {
    fn new(model: cut_to_size_quotation::Model, grade_name: String) -> Self {
        Self {
            id: model.id,
            series: model.series,
            thickness: round_money(model.thickness),
            size_full_sheet: model.size_full_sheet,
            cut_length: round_money(model.cut_length),
            cut_width: round_money(model.cut_width),
            machining_cost: round_money(model.machining_cost),
            cut_size_area: round_money(model.cut_size_area),
            quantity_per_sheet: model.quantity_per_sheet,
            num_full_sheets_required: model.num_full_sheets_required,
            quantity: model.quantity,
            base_price_full_sheet: round_money(model.base_price_full_sheet),
            cut_to_size_price_per_unit: round_money(model.cut_to_size_price_per_unit),
            total_calculated_price: round_money(model.total_calculated_price),
            created_at: model.created_at,
            grade_name,
        }
    }
}

/// A quotation of either kind, tagged with `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuotationDto {
    FullSheet(FullSheetQuotationDto),
    CutToSize(CutToSizeQuotationDto),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPurgeResult {
    pub deleted_count: u64,
    pub message: String,
}

/// Grade type code per product detail id.
async fn grade_names<C>(conn: &C, detail_ids: Vec<i32>) -> Result<HashMap<i32, String>, ServiceError>
where
    C: ConnectionTrait,
{
    let details = product_detail::Entity::find()
        .filter(product_detail::Column::Id.is_in(detail_ids))
        .all(conn)
        .await?;
    let grade_ids: Vec<i32> = details.iter().map(|d| d.grade_id).collect();
    let codes: HashMap<i32, String> = grade::Entity::find()
        .filter(grade::Column::Id.is_in(grade_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|g| (g.id, g.type_code))
        .collect();

    Ok(details
        .into_iter()
        .filter_map(|d| codes.get(&d.grade_id).map(|code| (d.id, code.clone())))
        .collect())
}

async fn grade_name_of<C>(conn: &C, detail_id: i32) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    let mut names = grade_names(conn, vec![detail_id]).await?;
    Ok(names
        .remove(&detail_id)
        .unwrap_or_else(|| "Unknown".to_string()))
}

async fn find_product_price<C>(conn: &C, id: i32) -> Result<product_price::Model, ServiceError>
where
    C: ConnectionTrait,
{
    product_price::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("ProductPrice", id))
}

#[derive(Clone)]
pub struct QuotationService {
    db: Arc<DatabaseConnection>,
}

impl QuotationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request))]
    pub async fn create_full_sheet(
        &self,
        request: FullSheetQuotationRequest,
    ) -> Result<FullSheetQuotationDto, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let detail = find_detail(&txn, request.product_detail_id).await?;
        let thickness = find_thickness(&txn, request.thickness_id).await?;
        let size = find_size(&txn, request.size_id).await?;
        let price = find_product_price(&txn, request.product_price_id).await?;
        let grade_name = grade_name_of(&txn, detail.id).await?;

        let saved = full_sheet_quotation::ActiveModel {
            series: Set(request.series.trim().to_string()),
            thickness: Set(round_money(request.thickness)),
            size: Set(request.size.trim().to_string()),
            quantity: Set(request.quantity),
            base_price: Set(round_money(request.base_price)),
            total_price: Set(round_money(request.total_price)),
            created_at: Set(Utc::now()),
            product_detail_id: Set(detail.id),
            thickness_id: Set(thickness.id),
            size_id: Set(size.id),
            product_price_id: Set(price.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        counter!("plastics.quotations.created", 1, "kind" => "full_sheet");
        info!(quotation_id = saved.id, "Created full-sheet quotation");
        Ok(FullSheetQuotationDto::new(saved, grade_name))
    }

    #[instrument(skip(self, request))]
    pub async fn create_cut_to_size(
        &self,
        request: CutToSizeQuotationRequest,
    ) -> Result<CutToSizeQuotationDto, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let detail = find_detail(&txn, request.product_detail_id).await?;
        let price = find_product_price(&txn, request.product_price_id).await?;
        let grade_name = grade_name_of(&txn, detail.id).await?;

        let saved = cut_to_size_quotation::ActiveModel {
            series: Set(request.series.trim().to_string()),
            thickness: Set(round_money(request.thickness)),
            size_full_sheet: Set(request.size_full_sheet.trim().to_string()),
            cut_length: Set(round_money(request.cut_length)),
            cut_width: Set(round_money(request.cut_width)),
            machining_cost: Set(round_money(request.machining_cost)),
            cut_size_area: Set(round_money(request.cut_size_area)),
            quantity_per_sheet: Set(request.quantity_per_sheet),
            num_full_sheets_required: Set(request.num_full_sheets_required),
            quantity: Set(request.quantity),
            base_price_full_sheet: Set(round_money(request.base_price_full_sheet)),
            cut_to_size_price_per_unit: Set(round_money(request.cut_to_size_price_per_unit)),
            total_calculated_price: Set(round_money(request.total_calculated_price)),
            created_at: Set(Utc::now()),
            product_detail_id: Set(detail.id),
            product_price_id: Set(price.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        counter!("plastics.quotations.created", 1, "kind" => "cut_to_size");
        info!(quotation_id = saved.id, "Created cut-to-size quotation");
        Ok(CutToSizeQuotationDto::new(saved, grade_name))
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn full_sheets(&self) -> Result<Vec<FullSheetQuotationDto>, ServiceError> {
        let db = &*self.db;
        let rows = full_sheet_quotation::Entity::find()
            .order_by_desc(full_sheet_quotation::Column::CreatedAt)
            .order_by_desc(full_sheet_quotation::Column::Id)
            .all(db)
            .await?;
        let names = grade_names(db, rows.iter().map(|q| q.product_detail_id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|q| {
                let name = names.get(&q.product_detail_id).cloned().unwrap_or_default();
                FullSheetQuotationDto::new(q, name)
            })
            .collect())
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn cut_to_size(&self) -> Result<Vec<CutToSizeQuotationDto>, ServiceError> {
        let db = &*self.db;
        let rows = cut_to_size_quotation::Entity::find()
            .order_by_desc(cut_to_size_quotation::Column::CreatedAt)
            .order_by_desc(cut_to_size_quotation::Column::Id)
            .all(db)
            .await?;
        let names = grade_names(db, rows.iter().map(|q| q.product_detail_id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|q| {
                let name = names.get(&q.product_detail_id).cloned().unwrap_or_default();
                CutToSizeQuotationDto::new(q, name)
            })
            .collect())
    }

    /// Ids are per table. The full-sheet table is probed first, so on a
    /// collision the full-sheet quotation wins.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<QuotationDto, ServiceError> {
        let db = &*self.db;
        if let Some(q) = full_sheet_quotation::Entity::find_by_id(id).one(db).await? {
            let name = grade_name_of(db, q.product_detail_id).await?;
            return Ok(QuotationDto::FullSheet(FullSheetQuotationDto::new(q, name)));
        }
        if let Some(q) = cut_to_size_quotation::Entity::find_by_id(id).one(db).await? {
            let name = grade_name_of(db, q.product_detail_id).await?;
            return Ok(QuotationDto::CutToSize(CutToSizeQuotationDto::new(q, name)));
        }
        Err(ServiceError::not_found("Quotation", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_all_full_sheets(&self) -> Result<QuotationPurgeResult, ServiceError> {
        let deleted = full_sheet_quotation::Entity::delete_many()
            .exec(&*self.db)
            .await?
            .rows_affected;
        info!(deleted, "Deleted all full-sheet quotations");
        Ok(QuotationPurgeResult {
            deleted_count: deleted,
            message: "All full sheets quotations deleted successfully".to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_all_cut_to_size(&self) -> Result<QuotationPurgeResult, ServiceError> {
        let deleted = cut_to_size_quotation::Entity::delete_many()
            .exec(&*self.db)
            .await?
            .rows_affected;
        info!(deleted, "Deleted all cut-to-size quotations");
        Ok(QuotationPurgeResult {
            deleted_count: deleted,
            message: "All cut-to-size quotations deleted successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_sheet_request() -> FullSheetQuotationRequest {
        FullSheetQuotationRequest {
            series: "Natural".into(),
            thickness: dec!(6),
            size: "2440x1220".into(),
            quantity: 2,
            base_price: dec!(150),
            total_price: dec!(300),
            product_detail_id: 1,
            thickness_id: 1,
            size_id: 1,
            product_price_id: 1,
        }
    }

    #[test]
    fn full_sheet_request_rules() {
        assert!(full_sheet_request().validate().is_ok());

        let mut blank_series = full_sheet_request();
        blank_series.series = "  ".into();
        assert!(blank_series.validate().is_err());

        let mut zero_quantity = full_sheet_request();
        zero_quantity.quantity = 0;
        assert!(zero_quantity.validate().is_err());

        let mut free = full_sheet_request();
        free.total_price = dec!(0);
        assert!(free.validate().is_err());
    }

    #[test]
    fn quotation_dto_is_tagged_by_kind() {
        let dto = QuotationDto::FullSheet(FullSheetQuotationDto {
            id: 1,
            series: "Natural".into(),
            thickness: dec!(6.00),
            size: "2440x1220".into(),
            quantity: 2,
            base_price: dec!(150.00),
            total_price: dec!(300.00),
            created_at: Utc::now(),
            grade_name: "PP-H".into(),
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["kind"], "full_sheet");
        assert_eq!(json["gradeName"], "PP-H");
        assert_eq!(json["totalPrice"], "300.00");
    }
}
