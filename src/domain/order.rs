//! Order records
//!
//! An order is written once at checkout submission and never edited, except
//! for its status, which an administrator may move through the back office.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::domain::totals::{OrderTotals, ShippingZone};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "fulfilled" => Ok(OrderStatus::Fulfilled),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

/// A frozen copy of a cart line: name and price are captured at submission
/// time, not referenced live.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub name: String,
    pub size: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: i64,
    pub line_total: i64,
}

impl OrderLine {
    pub fn freeze(line: &CartLine) -> Self {
        Self {
            product_id: line.product.product_id,
            name: line.product.name.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price(),
            line_total: line.line_total(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer: CustomerInfo,
    pub lines: Vec<OrderLine>,
    pub subtotal: i64,
    pub bundle_discount: i64,
    pub shipping_cost: i64,
    pub total: i64,
    pub shipping_zone: ShippingZone,
    pub status: OrderStatus,
    /// Manually reported transaction reference; payment is not processed
    /// by this system.
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn create(
        customer: CustomerInfo,
        lines: Vec<OrderLine>,
        totals: OrderTotals,
        shipping_zone: ShippingZone,
        payment_reference: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            order_number: format!("ORD-{:08}", rand::random::<u32>() % 100_000_000),
            customer,
            lines,
            subtotal: totals.subtotal,
            bundle_discount: totals.bundle_discount,
            shipping_cost: totals.shipping_cost,
            total: totals.total,
            shipping_zone,
            status: OrderStatus::Pending,
            payment_reference,
            created_at: now,
            updated_at: now,
        }
    }
}
