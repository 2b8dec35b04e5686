//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}', use [format_endpoint].

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";

/// The route for registering a new user.
pub const REGISTER: &str = "/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for checking whether the client holds a valid token.
pub const SESSION: &str = "/session";

/// The route to list a user's expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to create an expense.
pub const POST_EXPENSE: &str = "/expense";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route to list and create a user's income.
pub const INCOME: &str = "/income";
/// The route to update or delete a single income.
pub const INCOME_ITEM: &str = "/income/{income_id}";

/// The route for the merged, date ordered expenses and income.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the balance and budget summary.
pub const SUMMARY: &str = "/reports/summary";
/// The route for expenses grouped by category or sub-category.
pub const CATEGORIES: &str = "/reports/categories";
/// The route for income and expenses bucketed by day or month.
pub const TIME_SERIES: &str = "/reports/time-series";
/// The route for the chart configurations of the dashboard.
pub const CHARTS: &str = "/reports/charts";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
