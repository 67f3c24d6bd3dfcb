//! Catalog Store boundary
//!
//! Everything the storefront persists lives behind this trait: products,
//! promotions, and orders. The Postgres implementation is the production
//! path; the in-memory one backs tests and local runs without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{BundleDeal, Category, Order, OrderStatus, Product, Sale};
use crate::error::Result;

pub mod memory;
pub mod pg;

pub use memory::MemoryCatalog;
pub use pg::PgCatalog;

#[derive(Clone, Copy, Debug, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub active_only: bool,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>>;
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn insert_product(&self, product: &Product) -> Result<()>;
    async fn update_product(&self, product: &Product) -> Result<()>;
    /// Soft delete: the product stays readable for existing orders.
    async fn archive_product(&self, id: Uuid) -> Result<()>;

    async fn insert_sale(&self, sale: &Sale) -> Result<()>;
    /// The first active, in-window sale for a product, if any.
    async fn active_sale(&self, product_id: Uuid, now: DateTime<Utc>) -> Result<Option<Sale>>;

    async fn insert_bundle_deal(&self, deal: &BundleDeal) -> Result<()>;
    async fn list_bundle_deals(&self) -> Result<Vec<BundleDeal>>;
    /// The first deal flagged active. Window checks happen in the allocator.
    async fn active_bundle_deal(&self) -> Result<Option<BundleDeal>>;

    async fn insert_order(&self, order: &Order) -> Result<()>;
    async fn list_orders(&self) -> Result<Vec<Order>>;
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>>;
    /// Status is the only order field that may change after creation.
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order>;
}
