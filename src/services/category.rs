use crate::{
    entities::{category, grade},
    errors::ServiceError,
    services::{cascade, grade::GradeDto, validation::not_blank, CrudService},
};
use async_trait::async_trait;
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
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255), custom = "not_blank")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for CategoryDto {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Category with the type codes of its grades.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithGradesDto {
    pub id: i32,
    pub name: String,
    pub grades: Vec<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

pub(crate) async fn find_category<C>(conn: &C, id: i32) -> Result<category::Model, ServiceError>
where
    C: ConnectionTrait,
{
    category::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Category", id))
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_name_free<C>(
        conn: &C,
        name: &str,
        except_id: Option<i32>,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = category::Entity::find().filter(category::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(category::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_with_grades(&self) -> Result<Vec<CategoryWithGradesDto>, ServiceError> {
        let db = &*self.db;
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(db)
            .await?;
        let grades = grade::Entity::find()
            .order_by_asc(grade::Column::TypeCode)
            .all(db)
            .await?;

        let mut by_category: HashMap<i32, Vec<String>> = HashMap::new();
        for g in grades {
            by_category.entry(g.category_id).or_default().push(g.type_code);
        }

        Ok(categories
            .into_iter()
            .map(|c| CategoryWithGradesDto {
                grades: by_category.remove(&c.id).unwrap_or_default(),
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn grades_of(&self, category_id: i32) -> Result<Vec<GradeDto>, ServiceError> {
        let db = &*self.db;
        find_category(db, category_id).await?;
        let grades = grade::Entity::find()
            .filter(grade::Column::CategoryId.eq(category_id))
            .order_by_asc(grade::Column::TypeCode)
            .all(db)
            .await?;
        Ok(grades.into_iter().map(GradeDto::from).collect())
    }
}

#[async_trait]
impl CrudService for CategoryService {
    type Dto = CategoryDto;
    type Create = CategoryInput;
    type Update = CategoryInput;

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<CategoryDto, ServiceError> {
        Ok(find_category(&*self.db, id).await?.into())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<CategoryDto>, ServiceError> {
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, input: CategoryInput) -> Result<CategoryDto, ServiceError> {
        input.validate()?;
        let name = input.name.trim().to_string();

        let txn = self.db.begin().await?;
        Self::ensure_name_free(&txn, &name, None).await?;
        let created = category::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(category_id = created.id, "Created category");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    async fn update(&self, id: i32, input: CategoryInput) -> Result<CategoryDto, ServiceError> {
        input.validate()?;
        let name = input.name.trim().to_string();

        let txn = self.db.begin().await?;
        let existing = find_category(&txn, id).await?;
        Self::ensure_name_free(&txn, &name, Some(id)).await?;
        let mut active: category::ActiveModel = existing.into();
        active.name = Set(name);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(category_id = id, "Updated category");
        Ok(updated.into())
    }

    /// Removes the category together with its grades and everything below them.
    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_category(&txn, id).await?;
        let report = cascade::purge_category(&txn, id).await?;
        txn.commit().await?;

        info!(category_id = id, ?report, "Deleted category");
        Ok(())
    }
}
