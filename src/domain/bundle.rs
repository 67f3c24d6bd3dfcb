//! Cart-wide bundle deal allocation
//!
//! Pure, derived computation: given the current lines and the active deal,
//! decide which units get discounted and by how much. Recomputed on every
//! cart or deal change; never stored, never stateful.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::cart::{CartLine, LineKey};
use crate::domain::product::Category;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    Buy2Get1HalfOff,
}

impl DealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealType::Buy2Get1HalfOff => "buy_2_get_1_half_off",
        }
    }
}

/// A cart-wide promotion: for every `minimum_quantity` qualifying units, one
/// unit is discounted by `discount_percentage`, capped by
/// `max_discount_items` per allocation pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BundleDeal {
    pub id: Uuid,
    pub name: String,
    pub deal_type: DealType,
    pub minimum_quantity: u32,
    pub discount_percentage: u32,
    pub max_discount_items: u32,
    pub applicable_categories: Vec<Category>,
    pub is_active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BundleDeal {
    /// Unlike sales, deals honor both window bounds.
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.starts_at.map_or(true, |start| start <= now)
            && self.ends_at.map_or(true, |end| end >= now)
    }

    /// A line qualifies through the category allow-list, or through a
    /// shirt-type marker in the product name (apparel listed outside the
    /// allow-listed categories still counts).
    pub fn line_qualifies(&self, line: &CartLine) -> bool {
        self.applicable_categories.contains(&line.product.category)
            || line.product.name.to_lowercase().contains("shirt")
    }
}

/// Allocation result: per-line discount amounts plus the aggregate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BundleDiscounts {
    pub per_line: HashMap<LineKey, i64>,
    pub total: i64,
    pub discounted_units: u32,
}

impl BundleDiscounts {
    pub fn for_line(&self, key: &LineKey) -> i64 {
        self.per_line.get(key).copied().unwrap_or(0)
    }
}

/// Allocates bundle discounts over the cheapest qualifying units first.
///
/// For each `minimum_quantity` qualifying units one discount credit is
/// earned; credits are spent walking the qualifying lines in ascending
/// unit-price order (ties keep encounter order), consuming up to a line's
/// full quantity before moving on. Each discounted unit is reduced by
/// `discount_percentage` of its own unit price. An ineligible or absent deal
/// yields a zero result, not an error.
pub fn compute_bundle_discounts(
    lines: &[CartLine],
    deal: Option<&BundleDeal>,
    now: DateTime<Utc>,
) -> BundleDiscounts {
    let deal = match deal {
        Some(d) if d.is_eligible(now) && d.minimum_quantity > 0 => d,
        _ => return BundleDiscounts::default(),
    };

    let qualifying: Vec<&CartLine> = lines.iter().filter(|l| deal.line_qualifies(l)).collect();
    let total_qualifying_units: u32 = qualifying.iter().map(|l| l.quantity).sum();
    let bundle_sets = total_qualifying_units / deal.minimum_quantity;
    if bundle_sets == 0 {
        return BundleDiscounts::default();
    }

    // One discounted unit per set, clamped by the deal's per-pass cap.
    let mut remaining = if deal.max_discount_items > 0 {
        bundle_sets.min(deal.max_discount_items)
    } else {
        bundle_sets
    };

    // Cheapest first; sort_by_key is stable, so ties keep encounter order.
    let mut by_price = qualifying;
    by_price.sort_by_key(|l| l.unit_price());

    let mut result = BundleDiscounts::default();
    for line in by_price {
        if remaining == 0 {
            break;
        }
        let take = line.quantity.min(remaining);
        let per_unit = line.unit_price() * i64::from(deal.discount_percentage) / 100;
        let line_discount = per_unit * i64::from(take);
        if line_discount > 0 {
            *result.per_line.entry(line.key()).or_insert(0) += line_discount;
        }
        result.total += line_discount;
        result.discounted_units += take;
        remaining -= take;
    }
    result
}
