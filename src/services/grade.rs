use crate::{
    entities::grade,
    errors::ServiceError,
    services::{cascade, category::find_category, validation::not_blank, CrudService},
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeInput {
    pub category_id: i32,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub type_code: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGradeInput {
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub type_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeDto {
    pub id: i32,
    pub type_code: String,
    pub category_id: i32,
}

impl From<grade::Model> for GradeDto {
    fn from(model: grade::Model) -> Self {
        Self {
            id: model.id,
            type_code: model.type_code,
            category_id: model.category_id,
        }
    }
}

#[derive(Clone)]
pub struct GradeService {
    db: Arc<DatabaseConnection>,
}

pub(crate) async fn find_grade<C>(conn: &C, id: i32) -> Result<grade::Model, ServiceError>
where
    C: ConnectionTrait,
{
    grade::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Grade", id))
}

impl GradeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_type_code_free<C>(
        conn: &C,
        category_id: i32,
        type_code: &str,
        except_id: Option<i32>,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = grade::Entity::find()
            .filter(grade::Column::CategoryId.eq(category_id))
            .filter(grade::Column::TypeCode.eq(type_code));
        if let Some(id) = except_id {
            query = query.filter(grade::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Grade '{}' already exists in this category",
                type_code
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn by_category(&self, category_id: i32) -> Result<Vec<GradeDto>, ServiceError> {
        let grades = grade::Entity::find()
            .filter(grade::Column::CategoryId.eq(category_id))
            .order_by_asc(grade::Column::TypeCode)
            .all(&*self.db)
            .await?;
        Ok(grades.into_iter().map(GradeDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn by_type_code(&self, type_code: &str) -> Result<Vec<GradeDto>, ServiceError> {
        let grades = grade::Entity::find()
            .filter(grade::Column::TypeCode.eq(type_code.trim()))
            .order_by_asc(grade::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(grades.into_iter().map(GradeDto::from).collect())
    }
}

#[async_trait]
impl CrudService for GradeService {
    type Dto = GradeDto;
    type Create = CreateGradeInput;
    type Update = UpdateGradeInput;

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<GradeDto, ServiceError> {
        Ok(find_grade(&*self.db, id).await?.into())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<GradeDto>, ServiceError> {
        let grades = grade::Entity::find()
            .order_by_asc(grade::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(grades.into_iter().map(GradeDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, input: CreateGradeInput) -> Result<GradeDto, ServiceError> {
        input.validate()?;
        let type_code = input.type_code.trim().to_string();

        let txn = self.db.begin().await?;
        find_category(&txn, input.category_id).await?;
        Self::ensure_type_code_free(&txn, input.category_id, &type_code, None).await?;
        let created = grade::ActiveModel {
            type_code: Set(type_code),
            category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(grade_id = created.id, "Created grade");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    async fn update(&self, id: i32, input: UpdateGradeInput) -> Result<GradeDto, ServiceError> {
        input.validate()?;
        let type_code = input.type_code.trim().to_string();

        let txn = self.db.begin().await?;
        let existing = find_grade(&txn, id).await?;
        Self::ensure_type_code_free(&txn, existing.category_id, &type_code, Some(id)).await?;
        let mut active: grade::ActiveModel = existing.into();
        active.type_code = Set(type_code);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(grade_id = id, "Updated grade");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_grade(&txn, id).await?;
        let report = cascade::purge_grade(&txn, id).await?;
        txn.commit().await?;

        info!(grade_id = id, ?report, "Deleted grade");
        Ok(())
    }
}
