//! Shopping cart with merge-on-add line semantics

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::pricing::UnitPrice;
use crate::domain::product::{Category, Product};

/// Frozen view of a product taken when the line is added. Catalog edits after
/// that point are not reflected until checkout re-validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub name: String,
    pub category: Category,
    pub price: UnitPrice,
}

impl ProductSnapshot {
    pub fn capture(product: &Product, price: UnitPrice) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            category: product.category,
            price,
        }
    }
}

/// Identity of a cart line. Two adds with the same key merge into one line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: Uuid,
    pub size: String,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub size: String,
    pub quantity: u32,
    pub color: Option<String>,
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.product_id,
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    pub fn unit_price(&self) -> i64 {
        self.product.price.effective()
    }

    pub fn line_total(&self) -> i64 {
        self.unit_price() * i64::from(self.quantity)
    }
}

/// Ordered multiset of cart lines. Mutations are synchronous; persistence is
/// the caller's concern (see `cart_store`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merges into an existing line with the same (product, size, color);
    /// otherwise appends. A zero quantity is a no-op, not an error.
    pub fn add(&mut self, product: ProductSnapshot, size: impl Into<String>, quantity: u32, color: Option<String>) {
        if quantity == 0 {
            return;
        }
        let size = size.into();
        let key = LineKey { product_id: product.product_id, size: size.clone(), color: color.clone() };
        if let Some(line) = self.lines.iter_mut().find(|l| l.key() == key) {
            // A merge past u32::MAX saturates; wrapping to 0 would leave a
            // line violating the quantity >= 1 invariant.
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { product, size, quantity, color });
        }
    }

    /// Deletes the matching line entirely, whatever its quantity.
    pub fn remove(&mut self, product_id: Uuid, size: &str, color: Option<&str>) {
        self.lines.retain(|l| {
            !(l.product.product_id == product_id
                && l.size == size
                && l.color.as_deref() == color)
        });
    }

    /// Overwrites the line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, product_id: Uuid, size: &str, quantity: u32, color: Option<&str>) {
        if quantity == 0 {
            self.remove(product_id, size, color);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| {
            l.product.product_id == product_id && l.size == size && l.color.as_deref() == color
        }) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit_price * quantity` over lines, using the price attached
    /// when each line was added.
    pub fn subtotal(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn unit_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Serialized form: a bare JSON array of lines.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.lines).unwrap_or_else(|_| "[]".to_string())
    }

    /// Rehydrates a stored cart. Malformed payloads fall back to an empty
    /// cart rather than failing the session.
    pub fn from_json(payload: &str) -> Self {
        match serde_json::from_str::<Vec<CartLine>>(payload) {
            Ok(lines) => Self { lines },
            Err(err) => {
                warn!(%err, "discarding malformed stored cart");
                Self::new()
            }
        }
    }
}
