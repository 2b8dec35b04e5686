//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::{AuthState, auth_guard, get_session, post_log_in, post_log_out, register_user},
    endpoints,
    report::{get_categories, get_charts, get_summary, get_time_series, get_transactions},
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, list_expenses_endpoint, list_income_endpoint,
        update_expense_endpoint, update_income_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::SESSION, get(get_session));

    let protected_routes = Router::new()
        .route(endpoints::EXPENSES, get(list_expenses_endpoint))
        .route(endpoints::POST_EXPENSE, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::INCOME,
            get(list_income_endpoint).post(create_income_endpoint),
        )
        .route(
            endpoints::INCOME_ITEM,
            put(update_income_endpoint).delete(delete_income_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::SUMMARY, get(get_summary))
        .route(endpoints::CATEGORIES, get(get_categories))
        .route(endpoints::TIME_SERIES, get(get_time_series))
        .route(endpoints::CHARTS, get(get_charts))
        .route_layer(middleware::from_fn_with_state(
            AuthState::from_ref(&state),
            auth_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({ "message": "I'm a teapot" })),
    )
        .into_response()
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
