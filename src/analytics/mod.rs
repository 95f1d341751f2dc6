mod dishes;
mod insights;

pub use dishes::{
    analyze_dish_performance, dish_rating, is_underperforming, top_by_revenue, trend_percentage,
    trending_down, trending_up, underperforming, DishPerformance, LOW_ORDER_THRESHOLD,
    STRONG_TREND_PERCENT,
};
pub use insights::{generate_insights, Insight, InsightKind};
