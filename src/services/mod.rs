//! Business services. Catalog services share the [`CrudService`] contract;
//! each still owns its own validation and uniqueness rules.

pub mod cart;
pub mod cascade;
pub mod category;
pub mod grade;
pub mod money;
pub mod pricing;
pub mod product;
pub mod product_detail;
pub mod quotation;
pub mod size;
pub mod thickness;
pub mod validation;

use crate::errors::ServiceError;
use async_trait::async_trait;

/// The four verbs every catalog service exposes over integer keys.
#[async_trait]
pub trait CrudService: Send + Sync {
    type Dto: Send;
    type Create: Send;
    type Update: Send;

    async fn get_by_id(&self, id: i32) -> Result<Self::Dto, ServiceError>;
    async fn get_all(&self) -> Result<Vec<Self::Dto>, ServiceError>;
    async fn create(&self, input: Self::Create) -> Result<Self::Dto, ServiceError>;
    async fn update(&self, id: i32, input: Self::Update) -> Result<Self::Dto, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}
