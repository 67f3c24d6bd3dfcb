//! In-memory catalog store for tests and database-less local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::domain::{resolve_sale, BundleDeal, Order, OrderStatus, Product, Sale};
use crate::error::{Result, StoreError};

use super::{CatalogStore, ProductFilter};

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    sales: Vec<Sale>,
    deals: Vec<BundleDeal>,
    orders: Vec<Order>,
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: Mutex<Inner>,
    /// When set, promotion reads fail, exercising the degrade-to-no-promotion
    /// paths without a real outage.
    fail_promotions: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_promotions(&self, fail: bool) {
        self.fail_promotions.store(fail, Ordering::Relaxed);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn promotion_outage(&self) -> Result<()> {
        if self.fail_promotions.load(Ordering::Relaxed) {
            return Err(StoreError::Storage(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let inner = self.lock();
        Ok(inner
            .products
            .iter()
            .filter(|p| !filter.active_only || p.active)
            .filter(|p| filter.category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: &Product) -> Result<()> {
        self.lock().products.push(product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let mut inner = self.lock();
        let slot = inner
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreError::ProductNotFound)?;
        *slot = product.clone();
        Ok(())
    }

    async fn archive_product(&self, id: Uuid) -> Result<()> {
        let mut inner = self.lock();
        let slot = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::ProductNotFound)?;
        slot.active = false;
        slot.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_sale(&self, sale: &Sale) -> Result<()> {
        self.lock().sales.push(sale.clone());
        Ok(())
    }

    async fn active_sale(&self, product_id: Uuid, now: DateTime<Utc>) -> Result<Option<Sale>> {
        self.promotion_outage()?;
        let inner = self.lock();
        Ok(resolve_sale(&inner.sales, product_id, now).cloned())
    }

    async fn insert_bundle_deal(&self, deal: &BundleDeal) -> Result<()> {
        self.lock().deals.push(deal.clone());
        Ok(())
    }

    async fn list_bundle_deals(&self) -> Result<Vec<BundleDeal>> {
        Ok(self.lock().deals.clone())
    }

    async fn active_bundle_deal(&self) -> Result<Option<BundleDeal>> {
        self.promotion_outage()?;
        Ok(self.lock().deals.iter().find(|d| d.is_active).cloned())
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        self.lock().orders.push(order.clone());
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.lock().orders.clone())
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let mut inner = self.lock();
        let order = inner
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::OrderNotFound)?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}
