use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Write-once snapshot of a cut-to-size quotation. Geometry and pricing
/// figures are stored as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cut_to_size_quotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub series: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub thickness: Decimal,
    pub size_full_sheet: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cut_length: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cut_width: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub machining_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cut_size_area: Decimal,
    pub quantity_per_sheet: i32,
    pub num_full_sheets_required: i32,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_price_full_sheet: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cut_to_size_price_per_unit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_calculated_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub product_detail_id: i32,
    pub product_price_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_detail::Entity",
        from = "Column::ProductDetailId",
        to = "super::product_detail::Column::Id"
    )]
    ProductDetail,
    #[sea_orm(
        belongs_to = "super::product_price::Entity",
        from = "Column::ProductPriceId",
        to = "super::product_price::Column::Id"
    )]
    ProductPrice,
}

impl Related<super::product_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductDetail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
