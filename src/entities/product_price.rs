use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One cell of the pricing matrix: a unit price for a
/// (product detail, thickness, size) triple.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_detail_id: i32,
    pub thickness_id: i32,
    pub size_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
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
}

impl Related<super::product_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductDetail.def()
    }
}

impl Related<super::thickness::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Thickness.def()
    }
}

impl Related<super::size::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Size.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
