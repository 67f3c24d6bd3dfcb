//! Checkout orchestration
//!
//! Re-validates the cart against the live catalog, prices it with the active
//! bundle deal, and freezes the result into an order. Promotion reads degrade
//! to "no deal" on store failure; order persistence failures propagate so the
//! customer can retry with the cart intact.

use chrono::Utc;
use tracing::warn;

use crate::catalog::CatalogStore;
use crate::domain::{
    compute_bundle_discounts, Cart, CartLine, CustomerInfo, Order, OrderLine, OrderTotals,
    ShippingFees, ShippingZone,
};
use crate::error::{Result, StoreError};

/// What checkout hands back: the persisted order plus the names of any lines
/// dropped because their product went inactive since being added.
#[derive(Clone, Debug)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub dropped_lines: Vec<String>,
}

/// Builds and persists an order from the session's cart.
///
/// Lines whose product has been archived or deleted are dropped and reported
/// back; if nothing survives, submission is blocked with an empty-cart error
/// and nothing is written.
pub async fn submit_order(
    store: &dyn CatalogStore,
    cart: &Cart,
    customer: CustomerInfo,
    zone: ShippingZone,
    payment_reference: Option<String>,
    fees: &ShippingFees,
) -> Result<CheckoutOutcome> {
    if cart.is_empty() {
        return Err(StoreError::EmptyCart);
    }

    let mut kept: Vec<CartLine> = Vec::with_capacity(cart.lines().len());
    let mut dropped_lines = Vec::new();
    for line in cart.lines() {
        match store.get_product(line.product.product_id).await? {
            Some(product) if product.active => kept.push(line.clone()),
            _ => {
                warn!(product = %line.product.name, "dropping inactive product at checkout");
                dropped_lines.push(line.product.name.clone());
            }
        }
    }
    if kept.is_empty() {
        return Err(StoreError::EmptyCart);
    }

    let now = Utc::now();
    let deal = match store.active_bundle_deal().await {
        Ok(deal) => deal,
        Err(err) => {
            warn!(%err, "bundle deal lookup failed, pricing without a deal");
            None
        }
    };
    let discounts = compute_bundle_discounts(&kept, deal.as_ref(), now);

    let subtotal: i64 = kept.iter().map(CartLine::line_total).sum();
    let totals = OrderTotals::calculate(subtotal, discounts.total, fees.cost(zone));

    let lines = kept.iter().map(OrderLine::freeze).collect();
    let order = Order::create(customer, lines, totals, zone, payment_reference);
    store.insert_order(&order).await?;

    Ok(CheckoutOutcome { order, dropped_lines })
}
