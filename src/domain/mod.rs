//! Pure pricing and cart core. No I/O in this tree.

pub mod bundle;
pub mod cart;
pub mod order;
pub mod pricing;
pub mod product;
pub mod sale;
pub mod totals;

pub use bundle::{compute_bundle_discounts, BundleDeal, BundleDiscounts, DealType};
pub use cart::{Cart, CartLine, LineKey, ProductSnapshot};
pub use order::{CustomerInfo, Order, OrderLine, OrderStatus};
pub use pricing::UnitPrice;
pub use product::{Category, Product};
pub use sale::{resolve_sale, NewSale, Sale};
pub use totals::{OrderTotals, ShippingFees, ShippingZone};
