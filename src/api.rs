//! HTTP surface: storefront cart/checkout plus the admin back office

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::cart_store::CartStore;
use crate::catalog::{CatalogStore, ProductFilter};
use crate::checkout::submit_order;
use crate::domain::{
    compute_bundle_discounts, BundleDeal, Cart, Category, CustomerInfo, DealType, NewSale, Order,
    OrderStatus, Product, ProductSnapshot, Sale, ShippingFees, ShippingZone, UnitPrice,
};
use crate::error::{Result, StoreError};
use crate::webhook::WebhookNotifier;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub carts: CartStore,
    pub notifier: WebhookNotifier,
    pub fees: ShippingFees,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/products", get(list_products).post(create_product))
        .route(
            "/api/v1/products/:id",
            get(get_product).put(update_product).delete(archive_product),
        )
        .route("/api/v1/products/:id/sale", get(get_product_sale))
        .route("/api/v1/sales", post(create_sale))
        .route("/api/v1/bundle-deals", get(list_bundle_deals).post(create_bundle_deal))
        .route("/api/v1/cart/:session", get(get_cart).delete(clear_cart))
        .route(
            "/api/v1/cart/:session/items",
            post(add_to_cart).put(set_cart_quantity).delete(remove_cart_line),
        )
        .route("/api/v1/checkout", post(checkout))
        .route("/api/v1/orders", get(list_orders))
        .route("/api/v1/orders/:id", get(get_order))
        .route("/api/v1/orders/:id/status", put(update_order_status))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "paddock-store" }))
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductQuery {
    category: Option<Category>,
    active: Option<bool>,
}

async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        category: q.category,
        active_only: q.active.unwrap_or(true),
    };
    Ok(Json(state.catalog.list_products(filter).await?))
}

#[derive(Debug, Deserialize)]
struct CreateProductRequest {
    name: String,
    category: Category,
    price: i64,
    tags: Option<Vec<String>>,
}

async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    if req.name.trim().is_empty() {
        return Err(StoreError::Validation("product name must not be empty".into()));
    }
    if req.price <= 0 {
        return Err(StoreError::Validation("product price must be positive".into()));
    }
    let mut product = Product::new(req.name, req.category, req.price);
    product.tags = req.tags.unwrap_or_default();
    state.catalog.insert_product(&product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    state
        .catalog
        .get_product(id)
        .await?
        .map(Json)
        .ok_or(StoreError::ProductNotFound)
}

#[derive(Debug, Deserialize)]
struct UpdateProductRequest {
    name: String,
    category: Category,
    price: i64,
    active: bool,
    tags: Option<Vec<String>>,
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if req.price <= 0 {
        return Err(StoreError::Validation("product price must be positive".into()));
    }
    let mut product = state.catalog.get_product(id).await?.ok_or(StoreError::ProductNotFound)?;
    product.name = req.name;
    product.category = req.category;
    product.price = req.price;
    product.active = req.active;
    if let Some(tags) = req.tags {
        product.tags = tags;
    }
    product.updated_at = Utc::now();
    state.catalog.update_product(&product).await?;
    Ok(Json(product))
}

async fn archive_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.catalog.archive_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sales
// =============================================================================

/// Product-page view of an active sale, with the derived display figures.
#[derive(Debug, Serialize)]
struct SaleView {
    product_id: Uuid,
    title: String,
    description: String,
    original_price: i64,
    sale_price: i64,
    savings: i64,
    percentage_off: i64,
    valid_until: Option<DateTime<Utc>>,
}

impl From<Sale> for SaleView {
    fn from(sale: Sale) -> Self {
        Self {
            product_id: sale.product_id,
            title: sale.title.clone(),
            description: sale.description.clone(),
            original_price: sale.original_price,
            sale_price: sale.sale_price,
            savings: sale.savings(),
            percentage_off: sale.percentage_off(),
            valid_until: sale.ends_at,
        }
    }
}

async fn create_sale(
    State(state): State<AppState>,
    Json(req): Json<NewSale>,
) -> Result<(StatusCode, Json<Sale>)> {
    if state.catalog.get_product(req.product_id).await?.is_none() {
        return Err(StoreError::ProductNotFound);
    }
    let sale = req.into_sale()?;
    state.catalog.insert_sale(&sale).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// `null` body means the product is simply not on sale right now.
async fn get_product_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<SaleView>>> {
    let sale = state.catalog.active_sale(id, Utc::now()).await?;
    Ok(Json(sale.map(SaleView::from)))
}

// =============================================================================
// Bundle deals
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateBundleDealRequest {
    name: String,
    minimum_quantity: Option<u32>,
    discount_percentage: u32,
    max_discount_items: Option<u32>,
    applicable_categories: Vec<Category>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
}

async fn create_bundle_deal(
    State(state): State<AppState>,
    Json(req): Json<CreateBundleDealRequest>,
) -> Result<(StatusCode, Json<BundleDeal>)> {
    if req.discount_percentage > 100 {
        return Err(StoreError::Validation("discount percentage must be 0-100".into()));
    }
    let minimum_quantity = req.minimum_quantity.unwrap_or(2);
    if minimum_quantity == 0 {
        return Err(StoreError::Validation("minimum quantity must be at least 1".into()));
    }
    let deal = BundleDeal {
        id: Uuid::now_v7(),
        name: req.name,
        deal_type: DealType::Buy2Get1HalfOff,
        minimum_quantity,
        discount_percentage: req.discount_percentage,
        max_discount_items: req.max_discount_items.unwrap_or(minimum_quantity),
        applicable_categories: req.applicable_categories,
        is_active: true,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        created_at: Utc::now(),
    };
    state.catalog.insert_bundle_deal(&deal).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

async fn list_bundle_deals(State(state): State<AppState>) -> Result<Json<Vec<BundleDeal>>> {
    Ok(Json(state.catalog.list_bundle_deals().await?))
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Serialize)]
struct PricedLine {
    product_id: Uuid,
    name: String,
    category: Category,
    size: String,
    color: Option<String>,
    quantity: u32,
    unit_price: i64,
    original_price: Option<i64>,
    line_total: i64,
    bundle_discount: i64,
}

#[derive(Debug, Serialize)]
struct PricedCart {
    lines: Vec<PricedLine>,
    subtotal: i64,
    bundle_discount: i64,
}

/// Prices the cart for display, recomputing bundle discounts from scratch.
/// A failed deal lookup degrades to no-deal pricing rather than failing the
/// render.
async fn priced_view(state: &AppState, cart: &Cart) -> PricedCart {
    let deal = match state.catalog.active_bundle_deal().await {
        Ok(deal) => deal,
        Err(err) => {
            warn!(%err, "bundle deal lookup failed, rendering cart without a deal");
            None
        }
    };
    let discounts = compute_bundle_discounts(cart.lines(), deal.as_ref(), Utc::now());
    let lines = cart
        .lines()
        .iter()
        .map(|l| PricedLine {
            product_id: l.product.product_id,
            name: l.product.name.clone(),
            category: l.product.category,
            size: l.size.clone(),
            color: l.color.clone(),
            quantity: l.quantity,
            unit_price: l.unit_price(),
            original_price: l.product.price.original(),
            line_total: l.line_total(),
            bundle_discount: discounts.for_line(&l.key()),
        })
        .collect();
    PricedCart {
        lines,
        subtotal: cart.subtotal(),
        bundle_discount: discounts.total,
    }
}

async fn get_cart(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<PricedCart>> {
    let cart = state.carts.load(&session).await?;
    Ok(Json(priced_view(&state, &cart).await))
}

#[derive(Debug, Deserialize)]
struct AddToCartRequest {
    product_id: Uuid,
    size: String,
    quantity: i64,
    color: Option<String>,
}

/// Narrows a requested quantity. Non-positive values map to zero (the
/// ignore-on-add / remove-on-update semantics); values past `u32::MAX` are
/// rejected rather than truncated.
fn parse_quantity(raw: i64) -> Result<u32> {
    if raw <= 0 {
        return Ok(0);
    }
    u32::try_from(raw).map_err(|_| StoreError::Validation("quantity is out of range".into()))
}

async fn add_to_cart(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<PricedCart>> {
    // Non-positive quantity is ignored, not an error.
    let quantity = parse_quantity(req.quantity)?;
    let mut cart = state.carts.load(&session).await?;
    if quantity > 0 {
        let product = state
            .catalog
            .get_product(req.product_id)
            .await?
            .filter(|p| p.active)
            .ok_or(StoreError::ProductNotFound)?;
        let price = resolve_unit_price(&state, &product).await;
        let snapshot = ProductSnapshot::capture(&product, price);
        cart.add(snapshot, req.size, quantity, req.color);
        state.carts.save(&session, &cart).await?;
    }
    Ok(Json(priced_view(&state, &cart).await))
}

/// The effective unit price for a product right now: its sale override when
/// one is active, its base price otherwise. A failed sale lookup degrades to
/// the base price.
async fn resolve_unit_price(state: &AppState, product: &Product) -> UnitPrice {
    match state.catalog.active_sale(product.id, Utc::now()).await {
        Ok(Some(sale)) => UnitPrice::SaleOverride {
            original: sale.original_price,
            sale: sale.sale_price,
        },
        Ok(None) => UnitPrice::Flat { amount: product.price },
        Err(err) => {
            warn!(product = %product.name, %err, "sale lookup failed, using base price");
            UnitPrice::Flat { amount: product.price }
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateLineRequest {
    product_id: Uuid,
    size: String,
    quantity: i64,
    color: Option<String>,
}

async fn set_cart_quantity(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<Json<PricedCart>> {
    // Zero or negative behaves as removal.
    let quantity = parse_quantity(req.quantity)?;
    let mut cart = state.carts.load(&session).await?;
    cart.set_quantity(req.product_id, &req.size, quantity, req.color.as_deref());
    state.carts.save(&session, &cart).await?;
    Ok(Json(priced_view(&state, &cart).await))
}

#[derive(Debug, Deserialize)]
struct LineQuery {
    product_id: Uuid,
    size: String,
    color: Option<String>,
}

async fn remove_cart_line(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Query(q): Query<LineQuery>,
) -> Result<Json<PricedCart>> {
    let mut cart = state.carts.load(&session).await?;
    cart.remove(q.product_id, &q.size, q.color.as_deref());
    state.carts.save(&session, &cart).await?;
    Ok(Json(priced_view(&state, &cart).await))
}

async fn clear_cart(State(state): State<AppState>, Path(session): Path<String>) -> Result<StatusCode> {
    state.carts.clear(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Checkout & orders
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
struct CheckoutRequest {
    session: String,
    #[validate(length(min = 1))]
    full_name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 6))]
    phone: String,
    #[validate(length(min = 1))]
    address: String,
    #[validate(length(min = 1))]
    city: String,
    shipping_zone: ShippingZone,
    payment_reference: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckoutResponse {
    order: Order,
    /// Names of lines removed because their product went inactive.
    dropped_lines: Vec<String>,
    amount_due_now: i64,
}

async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    req.validate().map_err(|e| StoreError::Validation(e.to_string()))?;
    let cart = state.carts.load(&req.session).await?;
    let customer = CustomerInfo {
        full_name: req.full_name,
        email: req.email,
        phone: req.phone,
        address: req.address,
        city: req.city,
    };
    let outcome = submit_order(
        state.catalog.as_ref(),
        &cart,
        customer,
        req.shipping_zone,
        req.payment_reference,
        &state.fees,
    )
    .await?;

    // The order is persisted; clearing the session cart and notifying are
    // best-effort from here on.
    if let Err(err) = state.carts.clear(&req.session).await {
        warn!(%err, "failed to clear cart after checkout");
    }
    state.notifier.notify_order_created(&outcome.order);

    let amount_due_now = outcome.order.subtotal;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order: outcome.order,
            dropped_lines: outcome.dropped_lines,
            amount_due_now,
        }),
    ))
}

async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.catalog.list_orders().await?))
}

async fn get_order(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Order>> {
    state.catalog.get_order(id).await?.map(Json).ok_or(StoreError::OrderNotFound)
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    Ok(Json(state.catalog.update_order_status(id, req.status).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_bounds() {
        assert_eq!(parse_quantity(5).unwrap(), 5);
        assert_eq!(parse_quantity(0).unwrap(), 0);
        assert_eq!(parse_quantity(-3).unwrap(), 0);
        assert_eq!(parse_quantity(i64::from(u32::MAX)).unwrap(), u32::MAX);
        // One past u32::MAX would have truncated to 0 as a cast; it must be
        // rejected, and 2^32 + 1 must not come back as 1.
        assert!(matches!(
            parse_quantity(i64::from(u32::MAX) + 1),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(parse_quantity(4_294_967_297), Err(StoreError::Validation(_))));
    }
}
