pub mod auth;
pub mod cart;
pub mod categories;
pub mod common;
pub mod grades;
pub mod prices;
pub mod product_details;
pub mod products;
pub mod quotations;
pub mod sizes;
pub mod thicknesses;

use crate::{
    db::DbPool,
    services::{
        cart::CartService, category::CategoryService, grade::GradeService,
        pricing::PricingService, product::ProductService, product_detail::ProductDetailService,
        quotation::QuotationService, size::SizeService, thickness::ThicknessService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub grades: Arc<GradeService>,
    pub products: Arc<ProductService>,
    pub product_details: Arc<ProductDetailService>,
    pub thicknesses: Arc<ThicknessService>,
    pub sizes: Arc<SizeService>,
    pub pricing: Arc<PricingService>,
    pub cart: Arc<CartService>,
    pub quotations: Arc<QuotationService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            grades: Arc::new(GradeService::new(db_pool.clone())),
            products: Arc::new(ProductService::new(db_pool.clone())),
            product_details: Arc::new(ProductDetailService::new(db_pool.clone())),
            thicknesses: Arc::new(ThicknessService::new(db_pool.clone())),
            sizes: Arc::new(SizeService::new(db_pool.clone())),
            pricing: Arc::new(PricingService::new(db_pool.clone())),
            cart: Arc::new(CartService::new(db_pool.clone())),
            quotations: Arc::new(QuotationService::new(db_pool)),
        }
    }
}
