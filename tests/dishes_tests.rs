mod common;

use billing::analytics::{
    analyze_dish_performance, dish_rating, generate_insights, top_by_revenue, trend_percentage,
    trending_down, trending_up, underperforming, DishPerformance, InsightKind,
};
use billing::billing::Timeframe;
use billing::config::{Dish, Order, OrderStatus, PaymentType};
use billing::observer::NoopObserver;
use common::{at, dish, item, order};

// Week window: [2026-03-13T12:00, now], previous: [2026-03-06T12:00, 2026-03-13T12:00)
const NOW: &str = "2026-03-20T12:00:00+00:00";

fn catalog() -> Vec<Dish> {
    vec![
        dish("biryani", "Chicken Biryani", 100.0),
        dish("karahi", "Mutton Karahi", 200.0),
        dish("chai", "Masala Chai", 50.0),
    ]
}

fn order_with(id: &str, status: OrderStatus, created_at: &str, items: Vec<billing::OrderItem>) -> Order {
    let mut o = order(id, "c1", 0.0, status, PaymentType::Cash, created_at);
    o.items = items;
    o
}

fn week_orders() -> Vec<Order> {
    vec![
        // Current window
        order_with(
            "cur-1",
            OrderStatus::Approved,
            "2026-03-15T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 12), item("karahi", Some(200.0), 4)],
        ),
        order_with(
            "cur-2",
            OrderStatus::Approved,
            "2026-03-19T20:00:00+00:00",
            vec![item("biryani", Some(100.0), 8), item("karahi", Some(200.0), 6)],
        ),
        order_with(
            "cur-pending",
            OrderStatus::Pending,
            "2026-03-19T21:00:00+00:00",
            vec![item("chai", Some(50.0), 40)],
        ),
        // Previous window
        order_with(
            "prev-1",
            OrderStatus::Approved,
            "2026-03-10T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 10), item("karahi", Some(200.0), 20)],
        ),
        // Before both windows
        order_with(
            "ancient",
            OrderStatus::Approved,
            "2026-02-01T10:00:00+00:00",
            vec![item("chai", Some(50.0), 100)],
        ),
    ]
}

fn find<'a>(performances: &'a [DishPerformance], id: &str) -> &'a DishPerformance {
    performances.iter().find(|p| p.dish_id == id).unwrap()
}

#[test]
fn test_trend_percentage() {
    assert_eq!(trend_percentage(20, 10), 100.0);
    assert_eq!(trend_percentage(10, 20), -50.0);
    assert_eq!(trend_percentage(5, 0), 100.0);
    assert_eq!(trend_percentage(0, 0), 0.0);
    assert_eq!(trend_percentage(0, 4), -100.0);
}

#[test]
fn test_rating_bounds() {
    // No activity anywhere: every component is zero, rating floors at 1
    assert_eq!(dish_rating(0, 0, 0.0, 0.0, 0.0), 1.0);
    // Best in every dimension
    assert_eq!(dish_rating(10, 10, 500.0, 500.0, 250.0), 5.0);
    // Half the orders, all the revenue, flat
    assert_eq!(dish_rating(5, 10, 500.0, 500.0, 0.0), 3.0);
    // Negative trends never subtract
    assert_eq!(dish_rating(1, 4, 25.0, 100.0, -80.0), 1.0);
    // One decimal
    assert_eq!(dish_rating(1, 3, 0.0, 100.0, 0.0), 1.0);
    assert_eq!(dish_rating(2, 3, 0.0, 100.0, 0.0), 1.3);
}

#[test]
fn test_weekly_performance() {
    let dishes = catalog();
    let orders = week_orders();

    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    assert_eq!(performances.len(), 3);
    let ids: Vec<&str> = performances.iter().map(|p| p.dish_id.as_str()).collect();
    assert_eq!(ids, vec!["biryani", "karahi", "chai"]);

    let biryani = find(&performances, "biryani");
    assert_eq!(biryani.order_count, 20);
    assert_eq!(biryani.total_revenue, 2_000.0);
    assert_eq!(biryani.previous_order_count, 10);
    assert_eq!(biryani.trend_percentage, 100.0);
    assert_eq!(biryani.average_rating, 5.0);

    let karahi = find(&performances, "karahi");
    assert_eq!(karahi.order_count, 10);
    assert_eq!(karahi.total_revenue, 2_000.0);
    assert_eq!(karahi.previous_order_count, 20);
    assert_eq!(karahi.trend_percentage, -50.0);
    assert_eq!(karahi.average_rating, 3.0);

    let chai = find(&performances, "chai");
    assert_eq!(chai.order_count, 0);
    assert_eq!(chai.total_revenue, 0.0);
    assert_eq!(chai.trend_percentage, 0.0);
    assert_eq!(chai.average_rating, 1.0);
}

#[test]
fn test_catalog_price_used_when_line_has_none() {
    let dishes = catalog();
    let orders = vec![order_with(
        "o1",
        OrderStatus::Approved,
        "2026-03-18T10:00:00+00:00",
        vec![item("karahi", None, 3)],
    )];

    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    assert_eq!(find(&performances, "karahi").total_revenue, 600.0);
}

#[test]
fn test_all_time_counts_everything() {
    let dishes = catalog();
    let orders = week_orders();

    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::All, &at(NOW), &NoopObserver);

    let biryani = find(&performances, "biryani");
    assert_eq!(biryani.order_count, 30);
    assert_eq!(biryani.previous_order_count, 0);
    assert_eq!(biryani.trend_percentage, 100.0);

    let chai = find(&performances, "chai");
    assert_eq!(chai.order_count, 100);
    assert_eq!(chai.total_revenue, 5_000.0);
}

#[test]
fn test_no_orders_rates_every_dish_one() {
    let dishes = catalog();

    let performances =
        analyze_dish_performance(&[], &dishes, Timeframe::Month, &at(NOW), &NoopObserver);

    assert_eq!(performances.len(), 3);
    for p in &performances {
        assert_eq!(p.average_rating, 1.0);
        assert_eq!(p.trend_percentage, 0.0);
        assert!(p.trend_percentage.is_finite());
    }
}

#[test]
fn test_ranked_selectors() {
    let dishes = catalog();
    let orders = week_orders();
    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    let top: Vec<&str> = top_by_revenue(&performances, 2)
        .iter()
        .map(|p| p.dish_id.as_str())
        .collect();
    assert_eq!(top, vec!["biryani", "karahi"]);

    let up: Vec<&str> = trending_up(&performances, 5)
        .iter()
        .map(|p| p.dish_id.as_str())
        .collect();
    assert_eq!(up, vec!["biryani"]);

    let down: Vec<&str> = trending_down(&performances, 5)
        .iter()
        .map(|p| p.dish_id.as_str())
        .collect();
    assert_eq!(down, vec!["karahi"]);

    // chai: 0 + 0/10 = 0; karahi: 10 + (-50)/10 = 5
    let under: Vec<&str> = underperforming(&performances, 5)
        .iter()
        .map(|p| p.dish_id.as_str())
        .collect();
    assert_eq!(under, vec!["chai", "karahi"]);
}

#[test]
fn test_unavailable_dishes_are_not_underperforming() {
    let mut dishes = catalog();
    dishes[2].is_available = false;
    let orders = week_orders();
    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    let under: Vec<&str> = underperforming(&performances, 5)
        .iter()
        .map(|p| p.dish_id.as_str())
        .collect();
    assert_eq!(under, vec!["karahi"]);
}

#[test]
fn test_insights_one_per_category() {
    let dishes = catalog();
    let orders = week_orders();
    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    let insights = generate_insights(&performances);
    let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            InsightKind::TopRevenue,
            InsightKind::TrendingUp,
            InsightKind::TrendingDown,
            InsightKind::LowOrders,
        ]
    );

    assert_eq!(
        insights[0].message,
        "Chicken Biryani is your top earner, bringing in 50% of dish revenue"
    );
    assert_eq!(
        insights[1].message,
        "Chicken Biryani orders are up 100% on the previous period"
    );
    assert_eq!(
        insights[2].message,
        "Mutton Karahi orders are down 50% on the previous period"
    );
    assert_eq!(
        insights[3].message,
        "1 dish has fewer than 5 orders this period"
    );
}

#[test]
fn test_insights_skip_mild_trends() {
    let dishes = vec![dish("biryani", "Chicken Biryani", 100.0)];
    let orders = vec![
        order_with(
            "cur",
            OrderStatus::Approved,
            "2026-03-18T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 11)],
        ),
        order_with(
            "prev",
            OrderStatus::Approved,
            "2026-03-09T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 10)],
        ),
    ];
    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    let insights = generate_insights(&performances);

    let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![InsightKind::TopRevenue]);
    assert!(insights[0].message.contains("100%"));
}

#[test]
fn test_insights_empty_catalog() {
    assert!(generate_insights(&[]).is_empty());
}

#[test]
fn test_monthly_window_uses_calendar_months() {
    // Month window: [2026-02-20T12:00, now], previous: [2026-01-20T12:00, 2026-02-20T12:00)
    let dishes = catalog();
    let orders = vec![
        order_with(
            "mar",
            OrderStatus::Approved,
            "2026-03-01T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 6)],
        ),
        order_with(
            "late-feb",
            OrderStatus::Approved,
            "2026-02-25T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 4)],
        ),
        order_with(
            "early-feb",
            OrderStatus::Approved,
            "2026-02-10T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 5)],
        ),
        order_with(
            "mid-jan",
            OrderStatus::Approved,
            "2026-01-15T10:00:00+00:00",
            vec![item("biryani", Some(100.0), 50)],
        ),
    ];

    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Month, &at(NOW), &NoopObserver);

    let biryani = find(&performances, "biryani");
    assert_eq!(biryani.order_count, 10);
    assert_eq!(biryani.total_revenue, 1_000.0);
    assert_eq!(biryani.previous_order_count, 5);
    assert_eq!(biryani.trend_percentage, 100.0);

    // A week back from the same clock reaches none of them
    let weekly =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);
    assert_eq!(find(&weekly, "biryani").order_count, 0);
}

#[test]
fn test_order_at_window_start_counts_as_current() {
    // Week window starts at 2026-03-13T12:00Z, previous at 2026-03-06T12:00Z
    let dishes = catalog();
    let orders = vec![
        order_with(
            "at-start",
            OrderStatus::Approved,
            "2026-03-13T12:00:00+00:00",
            vec![item("biryani", Some(100.0), 3)],
        ),
        order_with(
            "at-start-ist",
            OrderStatus::Approved,
            "2026-03-13T17:30:00+05:30",
            vec![item("karahi", Some(200.0), 1)],
        ),
        order_with(
            "just-before",
            OrderStatus::Approved,
            "2026-03-13T11:59:59+00:00",
            vec![item("biryani", Some(100.0), 2)],
        ),
        order_with(
            "previous-start",
            OrderStatus::Approved,
            "2026-03-06T12:00:00+00:00",
            vec![item("biryani", Some(100.0), 1)],
        ),
        order_with(
            "too-old",
            OrderStatus::Approved,
            "2026-03-06T11:59:59+00:00",
            vec![item("biryani", Some(100.0), 7)],
        ),
    ];

    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    let biryani = find(&performances, "biryani");
    assert_eq!(biryani.order_count, 3);
    assert_eq!(biryani.previous_order_count, 3);
    assert_eq!(biryani.trend_percentage, 0.0);

    let karahi = find(&performances, "karahi");
    assert_eq!(karahi.order_count, 1);
    assert_eq!(karahi.previous_order_count, 0);
}

#[test]
fn test_huge_quantities_saturate() {
    let dishes = catalog();
    let orders = vec![order_with(
        "bulk",
        OrderStatus::Approved,
        "2026-03-18T10:00:00+00:00",
        vec![item("biryani", Some(100.0), u32::MAX), item("biryani", Some(100.0), 1)],
    )];

    let performances =
        analyze_dish_performance(&orders, &dishes, Timeframe::Week, &at(NOW), &NoopObserver);

    let biryani = find(&performances, "biryani");
    assert_eq!(biryani.order_count, u32::MAX);
    assert_eq!(biryani.total_revenue, 100.0 * (f64::from(u32::MAX) + 1.0));
    assert_eq!(biryani.average_rating, 5.0);
}
