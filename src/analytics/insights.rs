use serde::Serialize;

use super::dishes::{
    top_by_revenue, trending_down, trending_up, DishPerformance, LOW_ORDER_THRESHOLD,
    STRONG_TREND_PERCENT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    TopRevenue,
    TrendingUp,
    TrendingDown,
    LowOrders,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

/// Templated one-line summaries, at most one per [`InsightKind`]
pub fn generate_insights(performances: &[DishPerformance]) -> Vec<Insight> {
    let mut insights = Vec::new();

    let total_revenue: f64 = performances.iter().map(|p| p.total_revenue).sum();
    if let Some(top) = top_by_revenue(performances, 1).first() {
        if total_revenue > 0.0 && top.total_revenue > 0.0 {
            let share = top.total_revenue / total_revenue * 100.0;
            insights.push(Insight {
                kind: InsightKind::TopRevenue,
                message: format!(
                    "{} is your top earner, bringing in {share:.0}% of dish revenue",
                    top.name
                ),
            });
        }
    }

    if let Some(rising) = trending_up(performances, 1).first() {
        if rising.trend_percentage > STRONG_TREND_PERCENT {
            insights.push(Insight {
                kind: InsightKind::TrendingUp,
                message: format!(
                    "{} orders are up {:.0}% on the previous period",
                    rising.name, rising.trend_percentage
                ),
            });
        }
    }

    if let Some(falling) = trending_down(performances, 1).first() {
        if falling.trend_percentage < -STRONG_TREND_PERCENT {
            insights.push(Insight {
                kind: InsightKind::TrendingDown,
                message: format!(
                    "{} orders are down {:.0}% on the previous period",
                    falling.name,
                    falling.trend_percentage.abs()
                ),
            });
        }
    }

    let low = performances
        .iter()
        .filter(|p| p.is_available && p.order_count < LOW_ORDER_THRESHOLD)
        .count();
    if low > 0 {
        let message = if low == 1 {
            format!("1 dish has fewer than {LOW_ORDER_THRESHOLD} orders this period")
        } else {
            format!("{low} dishes have fewer than {LOW_ORDER_THRESHOLD} orders this period")
        };
        insights.push(Insight {
            kind: InsightKind::LowOrders,
            message,
        });
    }

    insights
}
