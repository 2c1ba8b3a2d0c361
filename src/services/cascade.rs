//! Ordered hard deletes for the catalog graph.
//!
//! Dependents always go first: cart lines and quotations, then prices, then
//! the dimension or catalog row itself. Callers run these inside a single
//! transaction so a partial cascade is never visible.

use crate::entities::{
    cart_item, category, cut_to_size_quotation, full_sheet_quotation, grade, product_detail,
    product_price, size, thickness,
};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use serde::Serialize;
use utoipa::ToSchema;

/// Row counts removed by a cascade.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub cart_items: u64,
    pub full_sheet_quotations: u64,
    pub cut_to_size_quotations: u64,
    pub prices: u64,
    pub product_details: u64,
}

impl CascadeReport {
    fn absorb(&mut self, other: CascadeReport) {
        self.cart_items += other.cart_items;
        self.full_sheet_quotations += other.full_sheet_quotations;
        self.cut_to_size_quotations += other.cut_to_size_quotations;
        self.prices += other.prices;
        self.product_details += other.product_details;
    }
}

async fn price_ids_where<C>(conn: &C, filter: sea_orm::Condition) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    product_price::Entity::find()
        .select_only()
        .column(product_price::Column::Id)
        .filter(filter)
        .into_tuple::<i32>()
        .all(conn)
        .await
}

/// Removes the given prices along with every cart line and quotation that
/// references them.
pub async fn purge_prices<C>(conn: &C, price_ids: &[i32]) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    let mut report = CascadeReport::default();
    if price_ids.is_empty() {
        return Ok(report);
    }
    let ids = price_ids.to_vec();

    report.cart_items = cart_item::Entity::delete_many()
        .filter(cart_item::Column::ProductPriceId.is_in(ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;
    report.full_sheet_quotations = full_sheet_quotation::Entity::delete_many()
        .filter(full_sheet_quotation::Column::ProductPriceId.is_in(ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;
    report.cut_to_size_quotations = cut_to_size_quotation::Entity::delete_many()
        .filter(cut_to_size_quotation::Column::ProductPriceId.is_in(ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;
    report.prices = product_price::Entity::delete_many()
        .filter(product_price::Column::Id.is_in(ids))
        .exec(conn)
        .await?
        .rows_affected;

    Ok(report)
}

/// Every price in the matrix and everything that references one.
pub async fn purge_all_prices<C>(conn: &C) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    let ids = price_ids_where(conn, sea_orm::Condition::all()).await?;
    purge_prices(conn, &ids).await
}

pub async fn purge_thickness<C>(conn: &C, thickness_id: i32) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    let mut report = CascadeReport {
        full_sheet_quotations: full_sheet_quotation::Entity::delete_many()
            .filter(full_sheet_quotation::Column::ThicknessId.eq(thickness_id))
            .exec(conn)
            .await?
            .rows_affected,
        ..Default::default()
    };

    let ids = price_ids_where(
        conn,
        sea_orm::Condition::all().add(product_price::Column::ThicknessId.eq(thickness_id)),
    )
    .await?;
    report.absorb(purge_prices(conn, &ids).await?);

    thickness::Entity::delete_by_id(thickness_id)
        .exec(conn)
        .await?;
    Ok(report)
}

pub async fn purge_size<C>(conn: &C, size_id: i32) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    let mut report = CascadeReport {
        full_sheet_quotations: full_sheet_quotation::Entity::delete_many()
            .filter(full_sheet_quotation::Column::SizeId.eq(size_id))
            .exec(conn)
            .await?
            .rows_affected,
        ..Default::default()
    };

    let ids = price_ids_where(
        conn,
        sea_orm::Condition::all().add(product_price::Column::SizeId.eq(size_id)),
    )
    .await?;
    report.absorb(purge_prices(conn, &ids).await?);

    size::Entity::delete_by_id(size_id).exec(conn).await?;
    Ok(report)
}

pub async fn purge_product_details<C>(conn: &C, detail_ids: &[i32]) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    let mut report = CascadeReport::default();
    if detail_ids.is_empty() {
        return Ok(report);
    }
    let ids = detail_ids.to_vec();

    report.cut_to_size_quotations = cut_to_size_quotation::Entity::delete_many()
        .filter(cut_to_size_quotation::Column::ProductDetailId.is_in(ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;
    report.full_sheet_quotations = full_sheet_quotation::Entity::delete_many()
        .filter(full_sheet_quotation::Column::ProductDetailId.is_in(ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;

    let price_ids = price_ids_where(
        conn,
        sea_orm::Condition::all().add(product_price::Column::ProductDetailId.is_in(ids.clone())),
    )
    .await?;
    report.absorb(purge_prices(conn, &price_ids).await?);

    report.product_details = product_detail::Entity::delete_many()
        .filter(product_detail::Column::Id.is_in(ids))
        .exec(conn)
        .await?
        .rows_affected;
    Ok(report)
}

async fn purge_grades<C>(conn: &C, grade_ids: &[i32]) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    if grade_ids.is_empty() {
        return Ok(CascadeReport::default());
    }
    let detail_ids = product_detail::Entity::find()
        .select_only()
        .column(product_detail::Column::Id)
        .filter(product_detail::Column::GradeId.is_in(grade_ids.to_vec()))
        .into_tuple::<i32>()
        .all(conn)
        .await?;
    let report = purge_product_details(conn, &detail_ids).await?;

    grade::Entity::delete_many()
        .filter(grade::Column::Id.is_in(grade_ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(report)
}

pub async fn purge_grade<C>(conn: &C, grade_id: i32) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    purge_grades(conn, &[grade_id]).await
}

pub async fn purge_category<C>(conn: &C, category_id: i32) -> Result<CascadeReport, DbErr>
where
    C: ConnectionTrait,
{
    let grade_ids = grade::Entity::find()
        .select_only()
        .column(grade::Column::Id)
        .filter(grade::Column::CategoryId.eq(category_id))
        .into_tuple::<i32>()
        .all(conn)
        .await?;
    let report = purge_grades(conn, &grade_ids).await?;

    category::Entity::delete_by_id(category_id)
        .exec(conn)
        .await?;
    Ok(report)
}
