mod monthly;
mod overdue;
pub mod period;
mod revenue;

pub use monthly::{calculate_monthly_bills, CustomerBill, MonthlyBillsReport};
pub use overdue::{
    calculate_overdue_bills, format_days_overdue, OverdueBill, OverdueReport, Severity,
    SeverityBreakdown,
};
pub use period::{current_month_range, month_range, prior_period, DateRange, Timeframe};
pub use revenue::{calculate_revenue, BalanceAnomaly, RevenueReport};
