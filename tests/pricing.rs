//! End-to-end properties of the pricing core: sale resolution, cart
//! arithmetic, bundle allocation, and checkout totals working together.

use chrono::Utc;
use uuid::Uuid;

use paddock_store::domain::{
    compute_bundle_discounts, BundleDeal, Cart, CartLine, Category, DealType, OrderTotals,
    ProductSnapshot, Sale, ShippingFees, ShippingZone, UnitPrice,
};

fn snapshot(name: &str, category: Category, price: UnitPrice) -> ProductSnapshot {
    ProductSnapshot {
        product_id: Uuid::now_v7(),
        name: name.into(),
        category,
        price,
    }
}

fn flat(name: &str, category: Category, amount: i64) -> ProductSnapshot {
    snapshot(name, category, UnitPrice::Flat { amount })
}

fn shirt_deal(minimum_quantity: u32, discount_percentage: u32) -> BundleDeal {
    BundleDeal {
        id: Uuid::now_v7(),
        name: "Buy 2 shirts, get 1 half off".into(),
        deal_type: DealType::Buy2Get1HalfOff,
        minimum_quantity,
        discount_percentage,
        max_discount_items: 100,
        applicable_categories: vec![Category::Drivers, Category::F1Classic, Category::Teams],
        is_active: true,
        starts_at: None,
        ends_at: None,
        created_at: Utc::now(),
    }
}

#[test]
fn subtotal_is_order_independent() {
    let a = flat("Driver Shirt", Category::Drivers, 1200);
    let b = flat("Team Shirt", Category::Teams, 900);
    let c = flat("Monaco Mousepad", Category::Mousepads, 500);

    let mut forward = Cart::new();
    forward.add(a.clone(), "M", 2, None);
    forward.add(b.clone(), "L", 1, None);
    forward.add(c.clone(), "one-size", 3, None);

    let mut backward = Cart::new();
    backward.add(c, "one-size", 3, None);
    backward.add(b, "L", 1, None);
    backward.add(a, "M", 2, None);

    assert_eq!(forward.subtotal(), backward.subtotal());
    assert_eq!(forward.subtotal(), 2 * 1200 + 900 + 3 * 500);
}

#[test]
fn adding_twice_equals_one_add_with_summed_quantity() {
    let p = flat("Team Shirt", Category::Teams, 900);

    let mut twice = Cart::new();
    twice.add(p.clone(), "M", 2, None);
    twice.add(p.clone(), "M", 3, None);

    let mut once = Cart::new();
    once.add(p, "M", 5, None);

    assert_eq!(twice.lines(), once.lines());
}

#[test]
fn worked_example_cheapest_unit_gets_half_off() {
    // Two qualifying lines at 100 and 200, quantity 1 each, minimum 2 at
    // 50%: exactly one discounted unit, on the 100 line, worth 50.
    let cheap = flat("Classic Shirt", Category::F1Classic, 100);
    let dear = flat("Driver Shirt", Category::Drivers, 200);
    let lines = vec![
        CartLine { product: dear, size: "M".into(), quantity: 1, color: None },
        CartLine { product: cheap.clone(), size: "M".into(), quantity: 1, color: None },
    ];
    let d = compute_bundle_discounts(&lines, Some(&shirt_deal(2, 50)), Utc::now());
    assert_eq!(d.discounted_units, 1);
    assert_eq!(d.total, 50);
    assert_eq!(d.for_line(&lines[1].key()), 50);
}

#[test]
fn one_qualifying_unit_earns_nothing() {
    let lines = vec![CartLine {
        product: flat("Team Shirt", Category::Teams, 900),
        size: "M".into(),
        quantity: 1,
        color: None,
    }];
    let d = compute_bundle_discounts(&lines, Some(&shirt_deal(2, 50)), Utc::now());
    assert_eq!(d.total, 0);
    assert_eq!(d.discounted_units, 0);
}

#[test]
fn discount_bounded_by_qualifying_value_and_sets() {
    let deal = shirt_deal(2, 50);
    let lines = vec![
        CartLine { product: flat("A Shirt", Category::Teams, 300), size: "S".into(), quantity: 4, color: None },
        CartLine { product: flat("B Shirt", Category::Drivers, 700), size: "M".into(), quantity: 3, color: None },
        CartLine { product: flat("Mousepad", Category::Mousepads, 100), size: "one-size".into(), quantity: 9, color: None },
    ];
    let qualifying_value: i64 = 4 * 300 + 3 * 700;
    let bundle_sets = (4 + 3) / 2;
    let d = compute_bundle_discounts(&lines, Some(&deal), Utc::now());
    assert!(d.total <= qualifying_value);
    assert!(d.discounted_units <= bundle_sets);
    // Cheapest-first: all three sets land on the 300 line.
    assert_eq!(d.discounted_units, 3);
    assert_eq!(d.total, 3 * 150);
}

#[test]
fn inactive_deal_never_discounts() {
    let mut deal = shirt_deal(2, 50);
    deal.is_active = false;
    let lines = vec![CartLine {
        product: flat("Team Shirt", Category::Teams, 900),
        size: "M".into(),
        quantity: 10,
        color: None,
    }];
    let d = compute_bundle_discounts(&lines, Some(&deal), Utc::now());
    assert_eq!(d.total, 0);
}

#[test]
fn sale_figures_for_display() {
    let sale = Sale {
        id: Uuid::now_v7(),
        product_id: Uuid::now_v7(),
        title: "Season opener".into(),
        description: String::new(),
        original_price: 1000,
        sale_price: 800,
        is_active: true,
        starts_at: None,
        ends_at: None,
        created_at: Utc::now(),
    };
    assert_eq!(sale.savings(), 200);
    assert_eq!(sale.percentage_off(), 20);
}

#[test]
fn sale_price_flows_into_cart_and_totals() {
    let on_sale = snapshot(
        "Classic Shirt",
        Category::F1Classic,
        UnitPrice::SaleOverride { original: 1000, sale: 800 },
    );
    let mut cart = Cart::new();
    cart.add(on_sale, "M", 2, None);
    assert_eq!(cart.subtotal(), 1600);

    let d = compute_bundle_discounts(cart.lines(), Some(&shirt_deal(2, 50)), Utc::now());
    // The discount is computed on the effective (sale) price.
    assert_eq!(d.total, 400);

    let fees = ShippingFees { local: 400, national: 800 };
    let totals = OrderTotals::calculate(cart.subtotal(), d.total, fees.cost(ShippingZone::National));
    assert_eq!(totals.total, 1600 + 800 - 400);
    assert_eq!(totals.amount_due_now, 1600);
}

#[test]
fn stored_cart_round_trips_as_a_set_of_lines() {
    let mut cart = Cart::new();
    cart.add(flat("Driver Shirt", Category::Drivers, 1200), "M", 2, Some("navy".into()));
    cart.add(flat("Team Shirt", Category::Teams, 900), "L", 1, None);
    cart.add(
        snapshot("Classic Shirt", Category::F1Classic, UnitPrice::SaleOverride { original: 1000, sale: 800 }),
        "S",
        4,
        None,
    );

    let restored = Cart::from_json(&cart.to_json());
    assert_eq!(restored.lines().len(), cart.lines().len());
    for line in cart.lines() {
        assert!(restored.lines().contains(line));
    }
}
