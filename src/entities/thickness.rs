use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "thicknesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", unique)]
    pub thickness: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_price::Entity")]
    ProductPrice,
}

impl Related<super::product_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display label, e.g. `2.5mm`.
    pub fn display_name(&self) -> String {
        format_thickness(self.thickness)
    }
}

/// Formats a thickness without trailing zeros: `2.50` becomes `2.5mm`.
pub fn format_thickness(value: Decimal) -> String {
    format!("{}mm", value.normalize())
}
