//! Per-product sale overrides

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// A time-boxed per-product price override. At most one sale per product is
/// treated as active at a time; if the store holds several, the resolver
/// picks the first eligible one rather than arbitrating further.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub description: String,
    pub original_price: i64,
    pub sale_price: i64,
    pub is_active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Creation payload, validated before it ever reaches storage.
#[derive(Clone, Debug, Deserialize)]
pub struct NewSale {
    pub product_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub original_price: i64,
    pub sale_price: i64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl NewSale {
    /// Rejects bad price pairs at creation time so display-time math
    /// (savings, percentage off) never divides by zero or goes negative.
    pub fn validate(&self) -> Result<()> {
        if self.original_price <= 0 {
            return Err(StoreError::InvalidSale("original price must be positive".into()));
        }
        if self.sale_price < 0 {
            return Err(StoreError::InvalidSale("sale price must not be negative".into()));
        }
        if self.sale_price >= self.original_price {
            return Err(StoreError::InvalidSale(
                "sale price must be strictly below the original price".into(),
            ));
        }
        Ok(())
    }

    pub fn into_sale(self) -> Result<Sale> {
        self.validate()?;
        Ok(Sale {
            id: Uuid::now_v7(),
            product_id: self.product_id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            original_price: self.original_price,
            sale_price: self.sale_price,
            is_active: true,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            created_at: Utc::now(),
        })
    }
}

impl Sale {
    /// A sale is eligible while active and not past its end. The start bound
    /// is deliberately not checked: a sale with a future start already
    /// surfaces on product pages, matching the storefront's behavior.
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.ends_at.map_or(true, |end| end >= now)
    }

    pub fn savings(&self) -> i64 {
        self.original_price - self.sale_price
    }

    /// Rounded percent off the original price. Safe because a zero original
    /// price is rejected at creation.
    pub fn percentage_off(&self) -> i64 {
        ((self.savings() as f64 / self.original_price as f64) * 100.0).round() as i64
    }
}

/// Picks the sale to honor for a product: the first active, in-window one.
pub fn resolve_sale<'a>(
    sales: &'a [Sale],
    product_id: Uuid,
    now: DateTime<Utc>,
) -> Option<&'a Sale> {
    sales
        .iter()
        .find(|s| s.product_id == product_id && s.is_eligible(now))
}
