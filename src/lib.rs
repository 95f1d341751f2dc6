pub mod analytics;
pub mod billing;
pub mod config;
pub mod error;
pub mod observer;

pub use analytics::{analyze_dish_performance, generate_insights, DishPerformance, Insight};
pub use billing::{
    calculate_monthly_bills, calculate_overdue_bills, calculate_revenue, format_days_overdue,
    MonthlyBillsReport, OverdueReport, RevenueReport, Severity, Timeframe,
};
pub use config::{Config, Customer, Dish, Order, OrderItem, OrderStatus, PaymentType, Role};
pub use error::{BillingError, Result};
pub use observer::{LogObserver, NoopObserver, ReportObserver};
