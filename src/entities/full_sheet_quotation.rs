use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Write-once snapshot of a full-sheet quotation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "full_sheet_quotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub series: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub thickness: Decimal,
    pub size: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub product_detail_id: i32,
    pub thickness_id: i32,
    pub size_id: i32,
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
        belongs_to = "super::thickness::Entity",
        from = "Column::ThicknessId",
        to = "super::thickness::Column::Id"
    )]
    Thickness,
    #[sea_orm(
        belongs_to = "super::size::Entity",
        from = "Column::SizeId",
        to = "super::size::Column::Id"
    )]
    Size,
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
