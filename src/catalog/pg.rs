//! Postgres-backed catalog store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{BundleDeal, Category, DealType, Order, OrderStatus, Product, Sale};
use crate::error::{Result, StoreError};

use super::{CatalogStore, ProductFilter};

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: String,
    price: i64,
    active: bool,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self> {
        Ok(Product {
            id: row.id,
            name: row.name,
            category: row.category.parse()?,
            price: row.price,
            active: row.active,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    product_id: Uuid,
    title: String,
    description: String,
    original_price: i64,
    sale_price: i64,
    is_active: bool,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            product_id: row.product_id,
            title: row.title,
            description: row.description,
            original_price: row.original_price,
            sale_price: row.sale_price,
            is_active: row.is_active,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BundleDealRow {
    id: Uuid,
    name: String,
    deal_type: String,
    minimum_quantity: i32,
    discount_percentage: i32,
    max_discount_items: i32,
    applicable_categories: Vec<String>,
    is_active: bool,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BundleDealRow> for BundleDeal {
    type Error = StoreError;

    fn try_from(row: BundleDealRow) -> Result<Self> {
        let deal_type = match row.deal_type.as_str() {
            "buy_2_get_1_half_off" => DealType::Buy2Get1HalfOff,
            other => return Err(StoreError::Integrity(format!("unknown deal type: {other}"))),
        };
        let applicable_categories = row
            .applicable_categories
            .iter()
            .map(|c| c.parse::<Category>())
            .collect::<Result<Vec<_>>>()?;
        Ok(BundleDeal {
            id: row.id,
            name: row.name,
            deal_type,
            minimum_quantity: row.minimum_quantity.max(0) as u32,
            discount_percentage: row.discount_percentage.clamp(0, 100) as u32,
            max_discount_items: row.max_discount_items.max(0) as u32,
            applicable_categories,
            is_active: row.is_active,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    customer: serde_json::Value,
    lines: serde_json::Value,
    subtotal: i64,
    bundle_discount: i64,
    shipping_cost: i64,
    total: i64,
    shipping_zone: String,
    status: String,
    payment_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let customer = serde_json::from_value(row.customer)
            .map_err(|e| StoreError::Integrity(format!("stored customer: {e}")))?;
        let lines = serde_json::from_value(row.lines)
            .map_err(|e| StoreError::Integrity(format!("stored order lines: {e}")))?;
        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            customer,
            lines,
            subtotal: row.subtotal,
            bundle_discount: row.bundle_discount,
            shipping_cost: row.shipping_cost,
            total: row.total,
            shipping_zone: row.shipping_zone.parse().map_err(StoreError::Integrity)?,
            status: row.status.parse().map_err(StoreError::Integrity)?,
            payment_reference: row.payment_reference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM products WHERE 1=1");
        if filter.active_only {
            sql.push_str(" AND active = TRUE");
        }
        if filter.category.is_some() {
            sql.push_str(" AND category = $1");
        }
        sql.push_str(" ORDER BY created_at DESC");
        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        if let Some(category) = filter.category {
            query = query.bind(category.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Product::try_from).transpose()
    }

    async fn insert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, name, category, price, active, tags, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.category.as_str())
        .bind(product.price)
        .bind(product.active)
        .bind(&product.tags)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let done = sqlx::query(
            "UPDATE products SET name = $2, category = $3, price = $4, active = $5, tags = $6, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.category.as_str())
        .bind(product.price)
        .bind(product.active)
        .bind(&product.tags)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::ProductNotFound);
        }
        Ok(())
    }

    async fn archive_product(&self, id: Uuid) -> Result<()> {
        let done = sqlx::query("UPDATE products SET active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::ProductNotFound);
        }
        Ok(())
    }

    async fn insert_sale(&self, sale: &Sale) -> Result<()> {
        sqlx::query(
            "INSERT INTO sales (id, product_id, title, description, original_price, sale_price, \
             is_active, starts_at, ends_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(sale.id)
        .bind(sale.product_id)
        .bind(&sale.title)
        .bind(&sale.description)
        .bind(sale.original_price)
        .bind(sale.sale_price)
        .bind(sale.is_active)
        .bind(sale.starts_at)
        .bind(sale.ends_at)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn active_sale(&self, product_id: Uuid, now: DateTime<Utc>) -> Result<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            "SELECT * FROM sales WHERE product_id = $1 AND is_active = TRUE \
             AND (ends_at IS NULL OR ends_at >= $2) ORDER BY created_at ASC LIMIT 1",
        )
        .bind(product_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Sale::from))
    }

    async fn insert_bundle_deal(&self, deal: &BundleDeal) -> Result<()> {
        let categories: Vec<&str> = deal.applicable_categories.iter().map(Category::as_str).collect();
        sqlx::query(
            "INSERT INTO bundle_deals (id, name, deal_type, minimum_quantity, discount_percentage, \
             max_discount_items, applicable_categories, is_active, starts_at, ends_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(deal.id)
        .bind(&deal.name)
        .bind(deal.deal_type.as_str())
        .bind(deal.minimum_quantity as i32)
        .bind(deal.discount_percentage as i32)
        .bind(deal.max_discount_items as i32)
        .bind(&categories)
        .bind(deal.is_active)
        .bind(deal.starts_at)
        .bind(deal.ends_at)
        .bind(deal.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_bundle_deals(&self) -> Result<Vec<BundleDeal>> {
        let rows = sqlx::query_as::<_, BundleDealRow>(
            "SELECT * FROM bundle_deals ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(BundleDeal::try_from).collect()
    }

    async fn active_bundle_deal(&self) -> Result<Option<BundleDeal>> {
        let row = sqlx::query_as::<_, BundleDealRow>(
            "SELECT * FROM bundle_deals WHERE is_active = TRUE ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        row.map(BundleDeal::try_from).transpose()
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        let customer = serde_json::to_value(&order.customer)
            .map_err(|e| StoreError::Integrity(e.to_string()))?;
        let lines = serde_json::to_value(&order.lines)
            .map_err(|e| StoreError::Integrity(e.to_string()))?;
        sqlx::query(
            "INSERT INTO orders (id, order_number, customer, lines, subtotal, bundle_discount, \
             shipping_cost, total, shipping_zone, status, payment_reference, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(customer)
        .bind(lines)
        .bind(order.subtotal)
        .bind(order.bundle_discount)
        .bind(order.shipping_cost)
        .bind(order.total)
        .bind(order.shipping_zone.as_str())
        .bind(order.status.as_str())
        .bind(&order.payment_reference)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Order::try_from).transpose()?.ok_or(StoreError::OrderNotFound)
    }
}
