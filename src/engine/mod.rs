//! Aggregation engine
//!
//! Pure functions turning raw record collections into chart series and
//! health metrics. No I/O, and inputs are never mutated.

pub mod buckets;
pub mod dashboard;
pub mod metrics;
pub mod trends;

pub use buckets::{activity_counts, CountBucket, SeriesPoint, ViewMode};
pub use dashboard::{build_dashboard, DashboardInput, DashboardSummary};
pub use metrics::{bmi, calorie_balance, hydration, weight_change, BmiCategory, BmiResult, ColorTag};
pub use trends::{metric_trend, weight_progress};
