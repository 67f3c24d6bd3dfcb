//! Checkout revalidation and submission behavior against an in-memory store.

use chrono::Utc;
use uuid::Uuid;

use paddock_store::catalog::{CatalogStore, MemoryCatalog};
use paddock_store::checkout::submit_order;
use paddock_store::domain::{
    BundleDeal, Cart, Category, CustomerInfo, DealType, Product, ProductSnapshot, ShippingFees,
    ShippingZone, UnitPrice,
};
use paddock_store::StoreError;

const FEES: ShippingFees = ShippingFees { local: 400, national: 800 };

fn customer() -> CustomerInfo {
    CustomerInfo {
        full_name: "N. Piquet".into(),
        email: "piquet@example.com".into(),
        phone: "0550000000".into(),
        address: "12 Pit Lane".into(),
        city: "Oran".into(),
    }
}

async fn seeded_product(store: &MemoryCatalog, name: &str, category: Category, price: i64) -> Product {
    let product = Product::new(name, category, price);
    store.insert_product(&product).await.unwrap();
    product
}

fn add_line(cart: &mut Cart, product: &Product, size: &str, quantity: u32) {
    let snapshot = ProductSnapshot::capture(product, UnitPrice::Flat { amount: product.price });
    cart.add(snapshot, size, quantity, None);
}

fn shirt_deal() -> BundleDeal {
    BundleDeal {
        id: Uuid::now_v7(),
        name: "Buy 2 shirts, get 1 half off".into(),
        deal_type: DealType::Buy2Get1HalfOff,
        minimum_quantity: 2,
        discount_percentage: 50,
        max_discount_items: 100,
        applicable_categories: vec![Category::Drivers, Category::F1Classic, Category::Teams],
        is_active: true,
        starts_at: None,
        ends_at: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn submission_persists_order_with_cod_totals() {
    let store = MemoryCatalog::new();
    let shirt = seeded_product(&store, "Team Shirt", Category::Teams, 1000).await;
    store.insert_bundle_deal(&shirt_deal()).await.unwrap();

    let mut cart = Cart::new();
    add_line(&mut cart, &shirt, "M", 2);

    let outcome = submit_order(&store, &cart, customer(), ShippingZone::National, None, &FEES)
        .await
        .unwrap();

    assert!(outcome.dropped_lines.is_empty());
    assert_eq!(outcome.order.subtotal, 2000);
    assert_eq!(outcome.order.bundle_discount, 500);
    assert_eq!(outcome.order.shipping_cost, 800);
    assert_eq!(outcome.order.total, 2000 + 800 - 500);

    let persisted = store.list_orders().await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].id, outcome.order.id);
}

#[tokio::test]
async fn inactive_line_is_dropped_with_warning() {
    let store = MemoryCatalog::new();
    let shirt = seeded_product(&store, "Team Shirt", Category::Teams, 1000).await;
    let retired = seeded_product(&store, "Retired Shirt", Category::Drivers, 1500).await;
    store.archive_product(retired.id).await.unwrap();

    let mut cart = Cart::new();
    add_line(&mut cart, &shirt, "M", 1);
    add_line(&mut cart, &retired, "L", 2);

    let outcome = submit_order(&store, &cart, customer(), ShippingZone::Local, None, &FEES)
        .await
        .unwrap();

    assert_eq!(outcome.dropped_lines, vec!["Retired Shirt".to_string()]);
    assert_eq!(outcome.order.lines.len(), 1);
    assert_eq!(outcome.order.subtotal, 1000);
}

#[tokio::test]
async fn emptied_cart_blocks_submission() {
    let store = MemoryCatalog::new();
    let retired = seeded_product(&store, "Retired Shirt", Category::Drivers, 1500).await;
    store.archive_product(retired.id).await.unwrap();

    let mut cart = Cart::new();
    add_line(&mut cart, &retired, "L", 1);

    let err = submit_order(&store, &cart, customer(), ShippingZone::Local, None, &FEES)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyCart));
    assert!(store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_blocks_submission_outright() {
    let store = MemoryCatalog::new();
    let err = submit_order(&store, &Cart::new(), customer(), ShippingZone::Local, None, &FEES)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyCart));
}

#[tokio::test]
async fn deal_lookup_failure_degrades_to_no_discount() {
    let store = MemoryCatalog::new();
    let shirt = seeded_product(&store, "Team Shirt", Category::Teams, 1000).await;
    store.insert_bundle_deal(&shirt_deal()).await.unwrap();
    store.fail_promotions(true);

    let mut cart = Cart::new();
    add_line(&mut cart, &shirt, "M", 2);

    // The outage must not block checkout; it only costs the discount.
    let outcome = submit_order(&store, &cart, customer(), ShippingZone::Local, None, &FEES)
        .await
        .unwrap();
    assert_eq!(outcome.order.bundle_discount, 0);
    assert_eq!(outcome.order.total, 2000 + 400);
}
