//! HTTP handlers for the dashboard reports.
//!
//! Every report is computed from the user's cached, merged transactions and
//! the server's local date.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use charming::Chart;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    report::{
        CategoryTotal, Drilldown, DrilldownLevel, DrilldownQuery, Period, Summary, TimeSeries,
        bucket_transactions, category_chart, group_by_drilldown, summarize, time_series_chart,
    },
    timezone::local_today,
    transaction::{Transaction, TransactionState},
};

/// List the user's expenses and income merged into one list, newest first.
pub async fn get_transactions(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let transactions = state.transactions.transactions(user_id)?;

    Ok(Json(transactions.to_vec()))
}

/// Get the balance and budget figures of the user.
pub async fn get_summary(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Summary>, Error> {
    let today = local_today(&state.local_timezone)?;
    let transactions = state.transactions.transactions(user_id)?;

    Ok(Json(summarize(&transactions, today)))
}

/// The body of the category report.
#[derive(Debug, Serialize)]
pub struct CategoryReport {
    /// The level that was grouped.
    pub drilldown: Drilldown,
    /// The expense totals at that level.
    pub categories: Vec<CategoryTotal>,
}

/// Get the user's expenses grouped by category, or by the sub-categories of
/// one category.
pub async fn get_categories(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<DrilldownQuery>, Error>,
) -> Result<Json<CategoryReport>, Error> {
    let drilldown = Drilldown::try_from(query)?;
    let transactions = state.transactions.transactions(user_id)?;

    Ok(Json(CategoryReport {
        categories: group_by_drilldown(&transactions, &drilldown),
        drilldown,
    }))
}

/// The query string of the time series endpoint, e.g. `?period=monthly`.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// Defaults to weekly.
    #[serde(default)]
    pub period: Period,
}

/// Get the user's income and expenses bucketed over the requested period.
pub async fn get_time_series(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, Error>,
) -> Result<Json<TimeSeries>, Error> {
    let today = local_today(&state.local_timezone)?;
    let transactions = state.transactions.transactions(user_id)?;

    Ok(Json(bucket_transactions(&transactions, query.period, today)))
}

/// The query string of the charts endpoint, e.g. `?period=yearly&level=subcategory&parent=Food`.
#[derive(Debug, Default, Deserialize)]
pub struct ChartsQuery {
    /// The window of the bar chart.
    #[serde(default)]
    pub period: Period,
    /// The drill-down level of the doughnut chart.
    #[serde(default)]
    pub level: DrilldownLevel,
    /// Required when `level` is sub-category.
    #[serde(default)]
    pub parent: Option<String>,
}

/// The ECharts options for the dashboard.
#[derive(Serialize)]
pub struct DashboardCharts {
    /// Income vs expenses per bucket.
    pub time_series: Chart,
    /// The expense breakdown at the current drill-down level.
    pub categories: Chart,
}

/// Get the chart options for the time series and category breakdown.
pub async fn get_charts(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<ChartsQuery>, Error>,
) -> Result<Json<DashboardCharts>, Error> {
    let drilldown = Drilldown::try_from(DrilldownQuery {
        level: query.level,
        parent: query.parent,
    })?;
    let today = local_today(&state.local_timezone)?;
    let transactions = state.transactions.transactions(user_id)?;

    let time_series = bucket_transactions(&transactions, query.period, today);
    let totals = group_by_drilldown(&transactions, &drilldown);

    Ok(Json(DashboardCharts {
        time_series: time_series_chart(&time_series),
        categories: category_chart(&totals, &drilldown),
    }))
}

#[cfg(test)]
mod report_handler_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        endpoints,
        test_utils::{TestClient, get_test_app_state},
        transaction::MAX_AMOUNT,
    };

    async fn add_example_transactions(client: &TestClient) {
        for body in [
            json!({ "amount": 50, "categories": "Food", "subcategories": "Groceries", "date": "2024-03-01" }),
            json!({ "amount": 20, "categories": "Food", "date": "2024-03-02" }),
        ] {
            client
                .post(endpoints::POST_EXPENSE)
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }

        client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 100, "inc_source": "Salary", "date": "2024-03-01" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn summary_of_example_transactions() {
        let client = TestClient::logged_in(get_test_app_state());
        add_example_transactions(&client).await;

        let response = client.get(endpoints::SUMMARY).await;

        response.assert_status_ok();
        let summary = response.json::<Value>();
        assert_eq!(summary["total_expense"], 70.0);
        assert_eq!(summary["total_income"], 100.0);
        assert_eq!(summary["balance"], 30.0);
        assert_eq!(summary["income_left"], 30.0);
        assert_eq!(summary["percentage_budget_left"], 30.0);
    }

    #[tokio::test]
    async fn summary_of_largest_amounts_is_finite() {
        let client = TestClient::logged_in(get_test_app_state());
        for _ in 0..2 {
            client
                .post(endpoints::INCOME)
                .json(&json!({
                    "amount": MAX_AMOUNT,
                    "inc_source": "Salary",
                    "date": "2024-03-01"
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let summary = client.get(endpoints::SUMMARY).await.json::<Value>();

        assert_eq!(summary["total_income"], 2.0 * MAX_AMOUNT);
        assert_eq!(summary["balance"], 2.0 * MAX_AMOUNT);
        assert_eq!(summary["percentage_budget_left"], 100.0);
    }

    #[tokio::test]
    async fn summary_without_income_has_null_percentage() {
        let client = TestClient::logged_in(get_test_app_state());

        let summary = client.get(endpoints::SUMMARY).await.json::<Value>();

        assert_eq!(summary["percentage_budget_left"], Value::Null);
    }

    #[tokio::test]
    async fn categories_of_example_transactions() {
        let client = TestClient::logged_in(get_test_app_state());
        add_example_transactions(&client).await;

        let response = client.get(endpoints::CATEGORIES).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "drilldown": { "level": "category", "parent": null },
                "categories": [{ "label": "Food", "total": 70.0 }]
            })
        );
    }

    #[tokio::test]
    async fn subcategories_of_food() {
        let client = TestClient::logged_in(get_test_app_state());
        add_example_transactions(&client).await;

        let response = client
            .get(endpoints::CATEGORIES)
            .add_query_param("level", "subcategory")
            .add_query_param("parent", "Food")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["categories"],
            json!([
                { "label": "Groceries", "total": 50.0 },
                { "label": "Other", "total": 20.0 }
            ])
        );
    }

    #[tokio::test]
    async fn subcategories_without_parent_is_bad_request() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .get(endpoints::CATEGORIES)
            .add_query_param("level", "subcategory")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn transactions_are_merged_newest_first() {
        let client = TestClient::logged_in(get_test_app_state());
        add_example_transactions(&client).await;

        let transactions = client.get(endpoints::TRANSACTIONS).await.json::<Value>();

        let kinds_and_dates: Vec<(String, String)> = transactions
            .as_array()
            .unwrap()
            .iter()
            .map(|t| {
                (
                    t["kind"].as_str().unwrap().to_owned(),
                    t["date"].as_str().unwrap().to_owned(),
                )
            })
            .collect();
        assert_eq!(
            kinds_and_dates,
            [
                ("expense".to_owned(), "2024-03-02".to_owned()),
                ("expense".to_owned(), "2024-03-01".to_owned()),
                ("income".to_owned(), "2024-03-01".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn reports_see_new_transactions() {
        let client = TestClient::logged_in(get_test_app_state());
        assert_eq!(
            client.get(endpoints::SUMMARY).await.json::<Value>()["total_expense"],
            0.0
        );

        add_example_transactions(&client).await;

        assert_eq!(
            client.get(endpoints::SUMMARY).await.json::<Value>()["total_expense"],
            70.0
        );
    }

    #[tokio::test]
    async fn weekly_time_series_ends_today() {
        let client = TestClient::logged_in(get_test_app_state());
        let today = OffsetDateTime::now_utc().date();
        let yesterday = today - Duration::days(1);
        client
            .post(endpoints::POST_EXPENSE)
            .json(&json!({ "amount": 4, "categories": "Food", "date": yesterday.to_string() }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = client
            .get(endpoints::TIME_SERIES)
            .add_query_param("period", "weekly")
            .await;

        response.assert_status_ok();
        let series = response.json::<Value>();
        assert_eq!(series["period"], "weekly");
        let buckets = series["buckets"].as_array().unwrap();
        assert_eq!(buckets.len(), 7);
        // The server's date may have rolled over to tomorrow since `today` was read.
        let days_passed = if buckets[6]["start"] == today.to_string() {
            0
        } else {
            assert_eq!(buckets[6]["start"], (today + Duration::days(1)).to_string());
            1
        };
        assert_eq!(buckets[5 - days_passed]["expense"], 4.0);
    }

    #[tokio::test]
    async fn unknown_period_is_json_bad_request() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .get(endpoints::TIME_SERIES)
            .add_query_param("period", "daily")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_level_is_json_bad_request() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .get(endpoints::CHARTS)
            .add_query_param("level", "everything")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn charts_returns_both_charts() {
        let client = TestClient::logged_in(get_test_app_state());
        add_example_transactions(&client).await;

        let response = client
            .get(endpoints::CHARTS)
            .add_query_param("period", "yearly")
            .await;

        response.assert_status_ok();
        let charts = response.json::<Value>();
        assert!(charts["time_series"].is_object());
        assert!(charts["categories"].is_object());
    }

    #[tokio::test]
    async fn reports_require_token() {
        let client = TestClient::logged_in(get_test_app_state());

        for endpoint in [
            endpoints::TRANSACTIONS,
            endpoints::SUMMARY,
            endpoints::CATEGORIES,
            endpoints::TIME_SERIES,
            endpoints::CHARTS,
        ] {
            client
                .server
                .get(endpoint)
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }
    }
}
