use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use std::collections::HashMap;

use crate::billing::period::{prior_period, Timeframe};
use crate::config::{Dish, Order};
use crate::observer::{NoopObserver, ReportObserver};

/// Dishes with fewer orders than this in the window count as underperforming
pub const LOW_ORDER_THRESHOLD: u32 = 5;

/// Period-over-period change (in percent) treated as a strong trend
pub const STRONG_TREND_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Serialize)]
pub struct DishPerformance {
    pub dish_id: String,
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub order_count: u32,
    pub total_revenue: f64,
    pub previous_order_count: u32,
    pub trend_percentage: f64,
    /// 1.0 to 5.0, one decimal
    pub average_rating: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    count: u32,
    revenue: f64,
}

/// Sum quantities and line revenue per dish over approved orders created in
/// `[from, until)`; `until = None` leaves the window open-ended.
fn tally_window<'a, Tz: TimeZone>(
    orders: &'a [Order],
    catalog_prices: &HashMap<&str, f64>,
    from: DateTime<FixedOffset>,
    until: Option<DateTime<FixedOffset>>,
    tz: &Tz,
    observer: &dyn ReportObserver,
) -> HashMap<&'a str, Tally> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for order in orders.iter().filter(|o| o.is_approved()) {
        let Some(created) = order.created_at(tz) else {
            observer.malformed_timestamp(&order.id, "created_at", &order.created_at);
            continue;
        };
        if created < from || until.is_some_and(|end| created >= end) {
            continue;
        }

        for item in &order.items {
            let price = item
                .price
                .or_else(|| catalog_prices.get(item.dish_id.as_str()).copied())
                .unwrap_or(0.0);
            let tally = tallies.entry(item.dish_id.as_str()).or_default();
            // Counts pin at u32::MAX rather than wrap
            tally.count = tally.count.saturating_add(item.quantity);
            tally.revenue += price * f64::from(item.quantity);
        }
    }

    tallies
}

/// Percentage change in order count. A dish with no previous orders but some
/// current ones is a 100% break-out; no activity at all is flat.
pub fn trend_percentage(current: u32, previous: u32) -> f64 {
    if previous > 0 {
        (f64::from(current) - f64::from(previous)) / f64::from(previous) * 100.0
    } else if current > 0 {
        100.0
    } else {
        0.0
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max).min(1.0)
    } else {
        0.0
    }
}

/// Star rating blended from relative order count (0-2), relative revenue
/// (0-2) and positive trend (0-1), clamped to 1..=5.
pub fn dish_rating(
    order_count: u32,
    max_order_count: u32,
    revenue: f64,
    max_revenue: f64,
    trend: f64,
) -> f64 {
    let count_score = ratio(f64::from(order_count), f64::from(max_order_count)) * 2.0;
    let revenue_score = ratio(revenue, max_revenue) * 2.0;
    let trend_score = (trend.max(0.0) / 100.0).min(1.0);

    let rating = (count_score + revenue_score + trend_score).clamp(1.0, 5.0);
    (rating * 10.0).round() / 10.0
}

/// Per-dish activity for the window ending at `now`, one entry per catalog
/// dish in catalog order.
pub fn analyze_dish_performance<Tz: TimeZone>(
    orders: &[Order],
    dishes: &[Dish],
    timeframe: Timeframe,
    now: &DateTime<Tz>,
    observer: &dyn ReportObserver,
) -> Vec<DishPerformance> {
    let tz = now.timezone();
    let window_start = prior_period(now, timeframe);
    let previous_start = match timeframe {
        Timeframe::All => None,
        _ => Some(prior_period(&window_start.with_timezone(&tz), timeframe)),
    };

    let catalog_prices: HashMap<&str, f64> =
        dishes.iter().map(|d| (d.id.as_str(), d.price)).collect();

    let current = tally_window(orders, &catalog_prices, window_start, None, &tz, observer);
    let previous = match previous_start {
        Some(start) if start < window_start => tally_window(
            orders,
            &catalog_prices,
            start,
            Some(window_start),
            &tz,
            &NoopObserver,
        ),
        _ => HashMap::new(),
    };

    let counts: Vec<(Tally, u32)> = dishes
        .iter()
        .map(|d| {
            let now_tally = current.get(d.id.as_str()).copied().unwrap_or_default();
            let prev_count = previous.get(d.id.as_str()).map_or(0, |t| t.count);
            (now_tally, prev_count)
        })
        .collect();

    let max_order_count = counts.iter().map(|(t, _)| t.count).max().unwrap_or(0);
    let max_revenue = counts.iter().map(|(t, _)| t.revenue).fold(0.0, f64::max);

    dishes
        .iter()
        .zip(counts)
        .map(|(dish, (tally, previous_order_count))| {
            let trend = trend_percentage(tally.count, previous_order_count);
            DishPerformance {
                dish_id: dish.id.clone(),
                name: dish.name.clone(),
                category: dish.category.clone(),
                price: dish.price,
                image_url: dish.image_url.clone(),
                is_available: dish.is_available,
                order_count: tally.count,
                total_revenue: tally.revenue,
                previous_order_count,
                trend_percentage: trend,
                average_rating: dish_rating(
                    tally.count,
                    max_order_count,
                    tally.revenue,
                    max_revenue,
                    trend,
                ),
            }
        })
        .collect()
}

/// Highest-earning dishes first
pub fn top_by_revenue(performances: &[DishPerformance], limit: usize) -> Vec<&DishPerformance> {
    let mut sorted: Vec<&DishPerformance> = performances.iter().collect();
    sorted.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    sorted.truncate(limit);
    sorted
}

/// Dishes with a positive trend, strongest first
pub fn trending_up(performances: &[DishPerformance], limit: usize) -> Vec<&DishPerformance> {
    let mut rising: Vec<&DishPerformance> = performances
        .iter()
        .filter(|p| p.trend_percentage > 0.0)
        .collect();
    rising.sort_by(|a, b| b.trend_percentage.total_cmp(&a.trend_percentage));
    rising.truncate(limit);
    rising
}

/// Dishes with a negative trend, steepest decline first
pub fn trending_down(performances: &[DishPerformance], limit: usize) -> Vec<&DishPerformance> {
    let mut falling: Vec<&DishPerformance> = performances
        .iter()
        .filter(|p| p.trend_percentage < 0.0)
        .collect();
    falling.sort_by(|a, b| a.trend_percentage.total_cmp(&b.trend_percentage));
    falling.truncate(limit);
    falling
}

fn low_performance_score(p: &DishPerformance) -> f64 {
    f64::from(p.order_count) + p.trend_percentage / 10.0
}

pub fn is_underperforming(p: &DishPerformance) -> bool {
    p.is_available
        && (p.order_count < LOW_ORDER_THRESHOLD || p.trend_percentage < -STRONG_TREND_PERCENT)
}

/// Available dishes that sell little or are losing ground, worst first
pub fn underperforming(performances: &[DishPerformance], limit: usize) -> Vec<&DishPerformance> {
    let mut weak: Vec<&DishPerformance> = performances
        .iter()
        .filter(|p| is_underperforming(p))
        .collect();
    weak.sort_by(|a, b| low_performance_score(a).total_cmp(&low_performance_score(b)));
    weak.truncate(limit);
    weak
}
