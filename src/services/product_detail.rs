use crate::{
    entities::{grade, product_detail, product_price},
    errors::ServiceError,
    services::{
        cascade,
        grade::find_grade,
        pricing::{price_dtos, PriceDto},
        product::BulkDeleteResult,
        CrudService,
    },
};
use async_trait::async_trait;
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
pub struct CreateProductDetailInput {
    pub grade_id: i32,
    #[serde(default)]
    pub series: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDetailInput {
    #[serde(default)]
    pub series: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailDto {
    pub id: i32,
    pub series: String,
    pub grade_id: i32,
    pub grade_type_code: String,
}

impl ProductDetailDto {
    fn new(detail: product_detail::Model, grade_type_code: String) -> Self {
        Self {
            id: detail.id,
            series: detail.series,
            grade_id: detail.grade_id,
            grade_type_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPricesDto {
    pub id: i32,
    pub series: String,
    pub prices: Vec<PriceDto>,
}

/// A grade with every series under it and each series' price list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradePricesDto {
    pub grade_id: i32,
    pub type_code: String,
    pub category_id: i32,
    pub product_details: Vec<SeriesPricesDto>,
}

fn normalize_series(raw: &str) -> Result<String, ServiceError> {
    let series = raw.trim();
    if series.is_empty() {
        return Err(ServiceError::validation("Series is required"));
    }
    Ok(series.to_string())
}

pub(crate) async fn find_detail<C>(conn: &C, id: i32) -> Result<product_detail::Model, ServiceError>
where
    C: ConnectionTrait,
{
    product_detail::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("ProductDetails", id))
}

#[derive(Clone)]
pub struct ProductDetailService {
    db: Arc<DatabaseConnection>,
}

impl ProductDetailService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_series_free<C>(
        conn: &C,
        grade_id: i32,
        series: &str,
        except_id: Option<i32>,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = product_detail::Entity::find()
            .filter(product_detail::Column::GradeId.eq(grade_id))
            .filter(product_detail::Column::Series.eq(series));
        if let Some(id) = except_id {
            query = query.filter(product_detail::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Series '{}' already exists for this grade",
                series
            )));
        }
        Ok(())
    }

    async fn with_type_codes(
        &self,
        details: Vec<product_detail::Model>,
    ) -> Result<Vec<ProductDetailDto>, ServiceError> {
        let grade_ids: Vec<i32> = details.iter().map(|d| d.grade_id).collect();
        let type_codes: HashMap<i32, String> = grade::Entity::find()
            .filter(grade::Column::Id.is_in(grade_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, g.type_code))
            .collect();

        Ok(details
            .into_iter()
            .map(|d| {
                let code = type_codes.get(&d.grade_id).cloned().unwrap_or_default();
                ProductDetailDto::new(d, code)
            })
            .collect())
    }

    /// Series of one grade, or every series when no grade is given.
    #[instrument(skip(self))]
    pub async fn list_by_grade(
        &self,
        grade_id: Option<i32>,
    ) -> Result<Vec<ProductDetailDto>, ServiceError> {
        let mut query = product_detail::Entity::find();
        if let Some(grade_id) = grade_id {
            find_grade(&*self.db, grade_id).await?;
            query = query.filter(product_detail::Column::GradeId.eq(grade_id));
        }
        let details = query
            .order_by_asc(product_detail::Column::Series)
            .all(&*self.db)
            .await?;
        self.with_type_codes(details).await
    }

    #[instrument(skip(self))]
    pub async fn with_prices(&self, grade_id: i32) -> Result<GradePricesDto, ServiceError> {
        let db = &*self.db;
        let grade = find_grade(db, grade_id).await?;
        let details = product_detail::Entity::find()
            .filter(product_detail::Column::GradeId.eq(grade_id))
            .order_by_asc(product_detail::Column::Series)
            .all(db)
            .await?;

        let detail_ids: Vec<i32> = details.iter().map(|d| d.id).collect();
        let prices = product_price::Entity::find()
            .filter(product_price::Column::ProductDetailId.is_in(detail_ids))
            .order_by_asc(product_price::Column::Id)
            .all(db)
            .await?;

        let mut by_detail: HashMap<i32, Vec<PriceDto>> = HashMap::new();
        for price in price_dtos(db, prices).await? {
            by_detail.entry(price.product_detail_id).or_default().push(price);
        }

        Ok(GradePricesDto {
            grade_id: grade.id,
            type_code: grade.type_code,
            category_id: grade.category_id,
            product_details: details
                .into_iter()
                .map(|d| SeriesPricesDto {
                    prices: by_detail.remove(&d.id).unwrap_or_default(),
                    id: d.id,
                    series: d.series,
                })
                .collect(),
        })
    }

    /// Removes every series and everything priced under them.
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<BulkDeleteResult, ServiceError> {
        let txn = self.db.begin().await?;
        let ids = product_detail::Entity::find()
            .select_only()
            .column(product_detail::Column::Id)
            .into_tuple::<i32>()
            .all(&txn)
            .await?;
        let report = cascade::purge_product_details(&txn, &ids).await?;
        let remaining = product_detail::Entity::find().count(&txn).await?;
        txn.commit().await?;

        info!(?report, "Deleted all product details");
        Ok(BulkDeleteResult {
            deleted_count: report.product_details,
            remaining_count: remaining,
        })
    }
}

#[async_trait]
impl CrudService for ProductDetailService {
    type Dto = ProductDetailDto;
    type Create = CreateProductDetailInput;
    type Update = UpdateProductDetailInput;

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<ProductDetailDto, ServiceError> {
        let detail = find_detail(&*self.db, id).await?;
        let grade = find_grade(&*self.db, detail.grade_id).await?;
        Ok(ProductDetailDto::new(detail, grade.type_code))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<ProductDetailDto>, ServiceError> {
        self.list_by_grade(None).await
    }

    #[instrument(skip(self))]
    async fn create(
        &self,
        input: CreateProductDetailInput,
    ) -> Result<ProductDetailDto, ServiceError> {
        let series = normalize_series(&input.series)?;

        let txn = self.db.begin().await?;
        let grade = find_grade(&txn, input.grade_id).await?;
        Self::ensure_series_free(&txn, grade.id, &series, None).await?;
        let created = product_detail::ActiveModel {
            series: Set(series),
            grade_id: Set(grade.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(product_detail_id = created.id, grade_id = grade.id, "Created series");
        Ok(ProductDetailDto::new(created, grade.type_code))
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        id: i32,
        input: UpdateProductDetailInput,
    ) -> Result<ProductDetailDto, ServiceError> {
        let series = normalize_series(&input.series)?;

        let txn = self.db.begin().await?;
        let existing = find_detail(&txn, id).await?;
        let grade = find_grade(&txn, existing.grade_id).await?;
        Self::ensure_series_free(&txn, grade.id, &series, Some(id)).await?;
        let mut active: product_detail::ActiveModel = existing.into();
        active.series = Set(series);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(product_detail_id = id, "Updated series");
        Ok(ProductDetailDto::new(updated, grade.type_code))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_detail(&txn, id).await?;
        let report = cascade::purge_product_details(&txn, &[id]).await?;
        txn.commit().await?;

        info!(product_detail_id = id, ?report, "Deleted series");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn series_is_trimmed_and_required() {
        assert_eq!(normalize_series("  PE-100 ").unwrap(), "PE-100");
        assert_matches!(
            normalize_series("   "),
            Err(ServiceError::ValidationError(msg)) if msg == "Series is required"
        );
    }
}
