//! The reporting core of the dashboard.
//!
//! Reports are pure functions of a user's merged transactions and a reference
//! date:
//! - [merge_transactions] combines expenses and income, newest first
//! - [summarize] calculates the balance and budget figures
//! - [group_by_drilldown] sums expenses per category or sub-category
//! - [bucket_transactions] builds the weekly, monthly and yearly time series

mod bucket;
mod category;
mod charts;
mod drilldown;
mod handlers;
mod merge;
mod summary;

pub use bucket::{Bucket, Period, TimeSeries, bucket_transactions};
pub use category::{CategoryTotal, group_by_category, group_by_drilldown, group_by_subcategory};
pub use charts::{category_chart, time_series_chart};
pub use drilldown::{Drilldown, DrilldownLevel, DrilldownQuery};
pub use handlers::{get_categories, get_charts, get_summary, get_time_series, get_transactions};
pub use merge::merge_transactions;
pub use summary::{Summary, summarize};
