use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sheet dimensions. The `(length, breadth)` pair is globally unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub length: i32,
    pub breadth: i32,
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
    pub fn display_name(&self) -> String {
        format_size(self.length, self.breadth)
    }
}

pub fn format_size(length: i32, breadth: i32) -> String {
    format!("{}x{}", length, breadth)
}
