//! Checkout totals

use serde::{Deserialize, Serialize};

/// Flat two-tier shipping. Not weight or distance based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingZone {
    Local,
    National,
}

impl ShippingZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingZone::Local => "local",
            ShippingZone::National => "national",
        }
    }
}

impl std::str::FromStr for ShippingZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(ShippingZone::Local),
            "national" => Ok(ShippingZone::National),
            other => Err(format!("unknown shipping zone: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShippingFees {
    pub local: i64,
    pub national: i64,
}

impl ShippingFees {
    pub fn cost(&self, zone: ShippingZone) -> i64 {
        match zone {
            ShippingZone::Local => self.local,
            ShippingZone::National => self.national,
        }
    }
}

/// Figures shown at checkout and frozen onto the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub bundle_discount: i64,
    pub shipping_cost: i64,
    pub total: i64,
    /// What the customer pays up front. Shipping is collected on delivery,
    /// so this is the subtotal alone and is NOT meant to equal `total`.
    /// Intentional cash-on-delivery rule; do not "fix".
    pub amount_due_now: i64,
}

impl OrderTotals {
    pub fn calculate(subtotal: i64, bundle_discount: i64, shipping_cost: i64) -> Self {
        Self {
            subtotal,
            bundle_discount,
            shipping_cost,
            total: subtotal + shipping_cost - bundle_discount,
            amount_due_now: subtotal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_composition() {
        let t = OrderTotals::calculate(5000, 500, 800);
        assert_eq!(t.total, 5300);
        assert_eq!(t.subtotal, 5000);
    }

    #[test]
    fn test_amount_due_now_excludes_shipping_and_discount() {
        let t = OrderTotals::calculate(5000, 500, 800);
        assert_eq!(t.amount_due_now, 5000);
        assert_ne!(t.amount_due_now, t.total);
    }

    #[test]
    fn test_shipping_tiers() {
        let fees = ShippingFees { local: 400, national: 800 };
        assert_eq!(fees.cost(ShippingZone::Local), 400);
        assert_eq!(fees.cost(ShippingZone::National), 800);
    }
}
