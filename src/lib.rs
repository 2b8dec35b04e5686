//! Spendwise is a web app for tracking your expenses and income.
//!
//! This library provides a JSON REST API for recording transactions and the
//! reporting core that turns them into dashboard summaries, category
//! breakdowns and time series.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod db;
mod endpoints;
mod logging;
mod report;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    DEFAULT_TOKEN_DURATION, Email, PasswordHash, User, UserID, ValidatedPassword, create_user,
    get_user_by_email, update_password,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{
    Bucket, CategoryTotal, Drilldown, DrilldownLevel, DrilldownQuery, Period, Summary,
    TimeSeries, bucket_transactions, category_chart, group_by_category, group_by_drilldown,
    group_by_subcategory, merge_transactions, summarize, time_series_chart,
};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    Expense, ExpenseId, Income, IncomeId, MAX_AMOUNT, NewExpense, NewIncome, OTHER_SUBCATEGORY,
    SQLiteTransactionRepository, Transaction, TransactionCache, TransactionKind,
    TransactionRepository, create_expense, create_income,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination does not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token is missing, malformed, expired or was not signed by
    /// this server.
    #[error("missing or invalid bearer token")]
    InvalidToken,

    /// The token for a logged-in user could not be created.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string used as an email address is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address is already registered to another user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// An empty string was used for the user's name.
    #[error("name cannot be empty")]
    EmptyName,

    /// The body, query string or path of a request could not be parsed, e.g.
    /// a field is missing or a date does not exist.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A transaction amount was not greater than zero, too large or not a
    /// finite number.
    #[error(
        "{0} is not a valid amount, amounts must be greater than zero and at most {max}",
        max = transaction::MAX_AMOUNT
    )]
    InvalidAmount(f64),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An empty string was used for an expense category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// An empty string was used for the source of an income.
    #[error("income source cannot be empty")]
    EmptyIncomeSource,

    /// The drill-down query asked for sub-categories without naming the
    /// parent category.
    #[error("a parent category is required to show sub-categories")]
    MissingParentCategory,

    /// A stored record violates the transaction invariants, e.g. the date
    /// cannot be parsed or the amount is negative.
    ///
    /// Reports built from such a record would be wrong, so the whole request
    /// fails instead.
    #[error("found a malformed transaction record: {0}")]
    MalformedRecord(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to update an income that does not exist
    #[error("tried to update an income that is not in the database")]
    UpdateMissingIncome,

    /// Tried to delete an income that does not exist
    #[error("tried to delete an income that is not in the database")]
    DeleteMissingIncome,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The body of a request or response could not be read while logging it.
    #[error("could not read the message body: {0}")]
    ReadBodyError(String),

    /// Could not acquire the transaction cache lock
    #[error("could not acquire the transaction cache lock")]
    CacheLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::FromSqlConversionFailure(column, _, error) => {
                tracing::error!("could not convert column {column}: {error}");
                Error::MalformedRecord(format!("column {column}: {error}"))
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::EmptyName
            | Error::InvalidRequest(_)
            | Error::InvalidAmount(_)
            | Error::FutureDate(_)
            | Error::EmptyCategory
            | Error::EmptyIncomeSource
            | Error::MissingParentCategory => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense
            | Error::UpdateMissingIncome
            | Error::DeleteMissingIncome => StatusCode::NOT_FOUND,
            Error::TokenCreation(_)
            | Error::HashingError(_)
            | Error::MalformedRecord(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::CacheLockError
            | Error::ReadBodyError(_)
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            Error::MalformedRecord(_) => {
                tracing::error!("Could not build a report: {}", self);
                "A stored transaction is malformed, check the server logs for more details."
                    .to_owned()
            }
            // Any other server errors are not intended to be shown to the client.
            error if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
