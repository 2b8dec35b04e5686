//! Endpoints for listing, creating, updating and deleting expenses.

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
    transaction::{Expense, ExpenseForm, ExpenseId, TransactionState},
};

/// List the user's expenses in the order they were created.
pub async fn list_expenses_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Expense>>, Error> {
    state.transactions.expenses(user_id).map(Json)
}

/// Create an expense and respond with the saved record and its URI.
pub async fn create_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(form), _): WithRejection<Json<ExpenseForm>, Error>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Expense>), Error> {
    let today = local_today(&state.local_timezone)?;
    let new_expense = form.validate(today)?;

    let expense = state.transactions.create_expense(user_id, new_expense)?;

    let location = format_endpoint(endpoints::EXPENSE, expense.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(expense)))
}

/// Replace every field of an expense and respond with the updated record.
pub async fn update_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(expense_id), _): WithRejection<Path<ExpenseId>, Error>,
    WithRejection(Json(form), _): WithRejection<Json<ExpenseForm>, Error>,
) -> Result<Json<Expense>, Error> {
    let today = local_today(&state.local_timezone)?;
    let new_expense = form.validate(today)?;

    state
        .transactions
        .update_expense(user_id, expense_id, new_expense)
        .map(Json)
}

/// Delete an expense.
pub async fn delete_expense_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(expense_id), _): WithRejection<Path<ExpenseId>, Error>,
) -> Result<StatusCode, Error> {
    state.transactions.delete_expense(user_id, expense_id)?;

    Ok(StatusCode::NO_CONTENT)
}
