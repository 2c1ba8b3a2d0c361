use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named series within a grade.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub series: String,
    pub grade_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grade::Entity",
        from = "Column::GradeId",
        to = "super::grade::Column::Id"
    )]
    Grade,
    #[sea_orm(has_many = "super::product_price::Entity")]
    ProductPrice,
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::product_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPrice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
