//! Cart lines keyed by price-point.
//!
//! Adding an already carted price-point merges into the existing line, and a
//! quantity change scales the line by the effective per-unit price baked into
//! its stored total rather than the matrix price.

use crate::{
    entities::{cart_item, grade, product_detail, product_price, size, thickness},
    errors::ServiceError,
    services::{
        money::{line_total, rescale_line_total, round_money},
        validation::{money_amount, percentage},
    },
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub product_price_id: i32,
    pub quantity: i32,
    /// Percentage in `0..=100`. Absent means no discount.
    #[validate(custom = "percentage")]
    #[schema(value_type = Option<f64>, example = 10.0)]
    pub discount: Option<Decimal>,
    /// Final line total computed by the caller; replaces the server figure.
    #[validate(custom = "money_amount")]
    #[schema(value_type = Option<f64>)]
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemInput {
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: i32,
    pub quantity: i32,
    #[schema(value_type = String, example = "270.00")]
    pub total_price: Decimal,
    #[schema(value_type = String, example = "100.00")]
    pub unit_price: Decimal,
    pub series: String,
    pub grade_name: String,
    pub thickness_name: String,
    pub length: i32,
    pub breadth: i32,
    pub product_price_id: i32,
    #[schema(value_type = Option<String>)]
    pub discount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotalDto {
    pub item_count: u64,
    pub total_quantity: i64,
    #[schema(value_type = String, example = "720.00")]
    pub total_price: Decimal,
}

fn ensure_quantity(quantity: i32) -> Result<(), ServiceError> {
    if quantity < 1 {
        return Err(ServiceError::validation("Quantity must be at least 1"));
    }
    Ok(())
}

/// New total for a line whose quantity changes to `new_quantity`.
fn updated_total(
    line: &cart_item::Model,
    unit_price: Decimal,
    new_quantity: i32,
) -> Result<Decimal, ServiceError> {
    match rescale_line_total(line.total_price, line.quantity, new_quantity)? {
        Some(total) => Ok(total),
        None => line_total(unit_price, new_quantity, line.discount, None),
    }
}

/// Lookup tables for rendering cart lines with their catalog names.
struct CatalogView {
    prices: HashMap<i32, product_price::Model>,
    details: HashMap<i32, product_detail::Model>,
    grades: HashMap<i32, grade::Model>,
    thicknesses: HashMap<i32, thickness::Model>,
    sizes: HashMap<i32, size::Model>,
}

impl CatalogView {
    async fn load<C>(conn: &C, price_ids: Vec<i32>) -> Result<Self, ServiceError>
    where
        C: ConnectionTrait,
    {
        let prices: HashMap<i32, product_price::Model> = product_price::Entity::find()
            .filter(product_price::Column::Id.is_in(price_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let detail_ids: Vec<i32> = prices.values().map(|p| p.product_detail_id).collect();
        let thickness_ids: Vec<i32> = prices.values().map(|p| p.thickness_id).collect();
        let size_ids: Vec<i32> = prices.values().map(|p| p.size_id).collect();

        let details: HashMap<i32, product_detail::Model> = product_detail::Entity::find()
            .filter(product_detail::Column::Id.is_in(detail_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        let grade_ids: Vec<i32> = details.values().map(|d| d.grade_id).collect();
        let grades = grade::Entity::find()
            .filter(grade::Column::Id.is_in(grade_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();
        let thicknesses = thickness::Entity::find()
            .filter(thickness::Column::Id.is_in(thickness_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let sizes = size::Entity::find()
            .filter(size::Column::Id.is_in(size_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(Self {
            prices,
            details,
            grades,
            thicknesses,
            sizes,
        })
    }

    fn render(&self, line: cart_item::Model) -> Result<CartItemDto, ServiceError> {
        let price = self
            .prices
            .get(&line.product_price_id)
            .ok_or_else(|| ServiceError::not_found("Product price", line.product_price_id))?;
        let detail = self
            .details
            .get(&price.product_detail_id)
            .ok_or_else(|| ServiceError::not_found("ProductDetails", price.product_detail_id))?;
        let grade_name = self
            .grades
            .get(&detail.grade_id)
            .map(|g| g.type_code.clone())
            .unwrap_or_default();
        let thickness_name = self
            .thicknesses
            .get(&price.thickness_id)
            .map(thickness::Model::display_name)
            .unwrap_or_default();
        let (length, breadth) = self
            .sizes
            .get(&price.size_id)
            .map(|s| (s.length, s.breadth))
            .unwrap_or_default();

        Ok(CartItemDto {
            id: line.id,
            quantity: line.quantity,
            total_price: round_money(line.total_price),
            unit_price: round_money(price.price),
            series: detail.series.clone(),
            grade_name,
            thickness_name,
            length,
            breadth,
            product_price_id: price.id,
            discount: line.discount.map(round_money),
        })
    }
}

#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn render_one<C>(conn: &C, line: cart_item::Model) -> Result<CartItemDto, ServiceError>
    where
        C: ConnectionTrait,
    {
        CatalogView::load(conn, vec![line.product_price_id])
            .await?
            .render(line)
    }

    /// Adds a price-point to the cart, merging into its existing line.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, input: AddToCartInput) -> Result<CartItemDto, ServiceError> {
        ensure_quantity(input.quantity)?;
        input.validate()?;

        let txn = self.db.begin().await?;
        let price = product_price::Entity::find_by_id(input.product_price_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product price", input.product_price_id))?;

        let existing = cart_item::Entity::find()
            .filter(cart_item::Column::ProductPriceId.eq(price.id))
            .one(&txn)
            .await?;
        let now = Utc::now();

        let saved = match existing {
            Some(line) => {
                let merged_quantity = line.quantity.checked_add(input.quantity).ok_or_else(|| {
                    ServiceError::validation("Quantity exceeds the supported range")
                })?;
                let total =
                    line_total(price.price, merged_quantity, input.discount, input.total_price)?;
                let mut active: cart_item::ActiveModel = line.into();
                active.quantity = Set(merged_quantity);
                active.total_price = Set(total);
                active.discount = Set(input.discount);
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                let total =
                    line_total(price.price, input.quantity, input.discount, input.total_price)?;
                cart_item::ActiveModel {
                    product_price_id: Set(price.id),
                    quantity: Set(input.quantity),
                    total_price: Set(total),
                    discount: Set(input.discount),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        let dto = Self::render_one(&txn, saved).await?;
        txn.commit().await?;

        counter!("plastics.cart.items_added", 1);
        info!(
            cart_item_id = dto.id,
            product_price_id = dto.product_price_id,
            quantity = dto.quantity,
            "Item added to cart"
        );
        Ok(dto)
    }

    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        id: i32,
        input: UpdateCartItemInput,
    ) -> Result<CartItemDto, ServiceError> {
        ensure_quantity(input.quantity)?;

        let txn = self.db.begin().await?;
        let line = cart_item::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart item", id))?;
        let price = match product_price::Entity::find_by_id(line.product_price_id)
            .one(&txn)
            .await?
        {
            Some(price) => price,
            None => {
                warn!(cart_item_id = id, "cart line points at a missing price");
                return Err(ServiceError::validation(
                    "Product price not found for cart item",
                ));
            }
        };

        let total = updated_total(&line, price.price, input.quantity)?;
        let mut active: cart_item::ActiveModel = line.into();
        active.quantity = Set(input.quantity);
        active.total_price = Set(total);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        let dto = Self::render_one(&txn, updated).await?;
        txn.commit().await?;

        info!(cart_item_id = id, quantity = input.quantity, %total, "Cart item updated");
        Ok(dto)
    }

    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, id: i32) -> Result<(), ServiceError> {
        let result = cart_item::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Cart item", id));
        }
        counter!("plastics.cart.items_removed", 1);
        info!(cart_item_id = id, "Item removed from cart");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn cart_items(&self) -> Result<Vec<CartItemDto>, ServiceError> {
        let db = &*self.db;
        let lines = cart_item::Entity::find()
            .order_by_asc(cart_item::Column::Id)
            .all(db)
            .await?;
        let view = CatalogView::load(db, lines.iter().map(|l| l.product_price_id).collect()).await?;
        lines.into_iter().map(|line| view.render(line)).collect()
    }

    #[instrument(skip(self))]
    pub async fn cart_total(&self) -> Result<CartTotalDto, ServiceError> {
        let lines = cart_item::Entity::find().all(&*self.db).await?;
        Ok(CartTotalDto {
            item_count: lines.len() as u64,
            total_quantity: lines.iter().map(|l| i64::from(l.quantity)).sum(),
            total_price: round_money(lines.iter().map(|l| l.total_price).sum()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn line(total: Decimal, quantity: i32, discount: Option<Decimal>) -> cart_item::Model {
        cart_item::Model {
            id: 1,
            product_price_id: 1,
            quantity,
            total_price: total,
            discount,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn quantity_below_one_is_rejected() {
        for q in [0, -1] {
            assert_matches!(
                ensure_quantity(q),
                Err(ServiceError::ValidationError(msg)) if msg == "Quantity must be at least 1"
            );
        }
        assert!(ensure_quantity(1).is_ok());
    }

    #[test]
    fn update_keeps_effective_unit_price() {
        let stored = line(dec!(270.00), 3, Some(dec!(10)));
        assert_eq!(updated_total(&stored, dec!(100.00), 5).unwrap(), dec!(450.00));
    }

    #[test]
    fn update_falls_back_to_matrix_price_with_stored_discount() {
        let stored = line(dec!(0), 3, Some(dec!(10)));
        assert_eq!(updated_total(&stored, dec!(100.00), 2).unwrap(), dec!(180.00));
    }

    #[test]
    fn discount_outside_percentage_range_fails_validation() {
        let input = AddToCartInput {
            product_price_id: 1,
            quantity: 1,
            discount: Some(dec!(120)),
            total_price: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn client_total_past_the_column_range_fails_validation() {
        let input = AddToCartInput {
            product_price_id: 1,
            quantity: 1,
            discount: None,
            total_price: Some(dec!(70000000000000000000000000000)),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn rescaling_a_stored_line_past_the_range_is_a_validation_error() {
        let stored = line(dec!(90000000.00), 1, None);
        assert_matches!(
            updated_total(&stored, dec!(100.00), 2),
            Err(ServiceError::ValidationError(_))
        );
    }
}
