//! ECharts options for the dashboard.
//!
//! - **Income and expenses**: grouped bar chart of each bucket of a time series
//! - **Expense breakdown**: doughnut chart of the current drill-down grouping

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};

use crate::report::{CategoryTotal, Drilldown, Period, TimeSeries};

/// A bar chart of the income and expenses in each bucket of `time_series`.
pub fn time_series_chart(time_series: &TimeSeries) -> Chart {
    let labels: Vec<String> = time_series
        .buckets
        .iter()
        .map(|bucket| bucket.label.clone())
        .collect();
    let income: Vec<f64> = time_series.buckets.iter().map(|bucket| bucket.income).collect();
    let expenses: Vec<f64> = time_series
        .buckets
        .iter()
        .map(|bucket| bucket.expense)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Income and expenses")
                .subtext(period_subtext(time_series.period)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Income").data(income))
        .series(Bar::new().name("Expenses").data(expenses))
}

/// A doughnut chart of the expense `totals` at the `drilldown` level.
pub fn category_chart(totals: &[CategoryTotal], drilldown: &Drilldown) -> Chart {
    let title = match drilldown {
        Drilldown::Category => "Expenses by category".to_owned(),
        Drilldown::Subcategory { parent } => format!("{parent} by sub-category"),
    };
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|total| (total.total, total.label.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

fn period_subtext(period: Period) -> &'static str {
    match period {
        Period::Weekly => "Last seven days",
        Period::Monthly => "Last thirty days",
        Period::Yearly => "Last twelve months",
    }
}
