//! Endpoints for listing, creating, updating and deleting income.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderName, StatusCode, header::LOCATION},
};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    timezone::local_today,
    transaction::{Income, IncomeForm, IncomeId, TransactionState},
};

/// List the user's income in the order it was created.
pub async fn list_income_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Income>>, Error> {
    state.transactions.income(user_id).map(Json)
}

/// Create an income and respond with the saved record and its URI.
pub async fn create_income_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(form), _): WithRejection<Json<IncomeForm>, Error>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Income>), Error> {
    let today = local_today(&state.local_timezone)?;
    let new_income = form.validate(today)?;

    let income = state.transactions.create_income(user_id, new_income)?;

    let location = format_endpoint(endpoints::INCOME_ITEM, income.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(income)))
}

/// Replace every field of an income and respond with the updated record.
pub async fn update_income_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(income_id), _): WithRejection<Path<IncomeId>, Error>,
    WithRejection(Json(form), _): WithRejection<Json<IncomeForm>, Error>,
) -> Result<Json<Income>, Error> {
    let today = local_today(&state.local_timezone)?;
    let new_income = form.validate(today)?;

    state
        .transactions
        .update_income(user_id, income_id, new_income)
        .map(Json)
}

/// Delete an income.
pub async fn delete_income_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(income_id), _): WithRejection<Path<IncomeId>, Error>,
) -> Result<StatusCode, Error> {
    state.transactions.delete_income(user_id, income_id)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod income_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{TestClient, get_test_app_state},
        transaction::Income,
    };

    #[tokio::test]
    async fn create_and_list_income() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 100, "inc_source": "Salary", "date": "2024-03-01" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let income = response.json::<Income>();
        assert_eq!(income.source, "Salary");
        assert_eq!(
            client.get(endpoints::INCOME).await.json::<Vec<Income>>(),
            vec![income]
        );
    }

    #[tokio::test]
    async fn create_income_rejects_blank_source() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 100, "inc_source": "  ", "date": "2024-03-01" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "income source cannot be empty"
        );
    }

    #[tokio::test]
    async fn create_income_rejects_amount_too_large_to_sum() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 1.7e308, "inc_source": "Salary", "date": "2024-03-01" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(client.get(endpoints::INCOME).await.json::<Vec<Income>>().is_empty());
    }

    #[tokio::test]
    async fn create_income_with_missing_field_is_json_bad_request() {
        let client = TestClient::logged_in(get_test_app_state());

        let response = client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 10, "date": "2024-03-01" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn update_income_replaces_fields() {
        let client = TestClient::logged_in(get_test_app_state());
        let created = client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 100, "inc_source": "Salary", "date": "2024-03-01" }))
            .await
            .json::<Income>();

        let response = client
            .put(&format_endpoint(endpoints::INCOME_ITEM, created.id))
            .json(&json!({ "amount": 150, "inc_source": "Bonus", "date": "2024-03-05" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Income>();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 150.0);
        assert_eq!(updated.source, "Bonus");
    }

    #[tokio::test]
    async fn delete_missing_income_is_not_found() {
        let client = TestClient::logged_in(get_test_app_state());

        client
            .delete(&format_endpoint(endpoints::INCOME_ITEM, 12))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_income_removes_it() {
        let client = TestClient::logged_in(get_test_app_state());
        let created = client
            .post(endpoints::INCOME)
            .json(&json!({ "amount": 100, "inc_source": "Salary", "date": "2024-03-01" }))
            .await
            .json::<Income>();

        client
            .delete(&format_endpoint(endpoints::INCOME_ITEM, created.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(client.get(endpoints::INCOME).await.json::<Vec<Income>>().is_empty());
    }
}
