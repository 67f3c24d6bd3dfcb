//! Normalized per-unit pricing
//!
//! A cart line carries exactly one of these, resolved once when the line is
//! added. Downstream code never re-inspects optional sale fields; it asks the
//! price for its effective amount.

use serde::{Deserialize, Serialize};

/// The price actually charged per unit, before any bundle discount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnitPrice {
    /// No promotion: the product's base price.
    Flat { amount: i64 },
    /// A per-product sale override. `sale` is strictly below `original`;
    /// enforced when the sale record is created.
    SaleOverride { original: i64, sale: i64 },
}

impl UnitPrice {
    /// Amount charged per unit.
    pub fn effective(&self) -> i64 {
        match self {
            UnitPrice::Flat { amount } => *amount,
            UnitPrice::SaleOverride { sale, .. } => *sale,
        }
    }

    /// Struck-through display price, when a sale applies.
    pub fn original(&self) -> Option<i64> {
        match self {
            UnitPrice::Flat { .. } => None,
            UnitPrice::SaleOverride { original, .. } => Some(*original),
        }
    }

    pub fn savings(&self) -> i64 {
        match self {
            UnitPrice::Flat { .. } => 0,
            UnitPrice::SaleOverride { original, sale } => original - sale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_and_savings() {
        let flat = UnitPrice::Flat { amount: 2500 };
        assert_eq!(flat.effective(), 2500);
        assert_eq!(flat.original(), None);
        assert_eq!(flat.savings(), 0);

        let on_sale = UnitPrice::SaleOverride { original: 1000, sale: 800 };
        assert_eq!(on_sale.effective(), 800);
        assert_eq!(on_sale.original(), Some(1000));
        assert_eq!(on_sale.savings(), 200);
    }
}
