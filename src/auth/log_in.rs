//! Handles log-in requests and issues bearer tokens.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{Email, TokenKeys, encode_token, get_user_by_email},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The keys for signing bearer tokens.
    pub token_keys: TokenKeys,
    /// The duration for which bearer tokens are valid.
    pub token_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
            token_duration: state.token_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of the responses from the log-in, register and log-out endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// A message that can be shown to the user.
    pub message: String,
    /// The bearer token, only set after a successful log-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthResponse {
    pub(crate) fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
            token: None,
        }
    }

    pub(crate) fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_owned(),
            token: None,
        }
    }
}

/// The log-in details entered by the user.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password in the database, which has been verified.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in the response contains a bearer token that expires
/// after the configured token duration. An unknown email and a wrong password
/// give the same 401 response.
pub async fn post_log_in(
    State(state): State<LogInState>,
    WithRejection(Json(user_data), _): WithRejection<Json<LogInData>, Error>,
) -> Response {
    match log_in(&state, &user_data) {
        Ok(token) => (
            StatusCode::OK,
            Json(AuthResponse {
                success: true,
                message: "Logged in.".to_owned(),
                token: Some(token),
            }),
        )
            .into_response(),
        Err(Error::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::failure(INVALID_CREDENTIALS_ERROR_MSG)),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

fn log_in(state: &LogInState, user_data: &LogInData) -> Result<String, Error> {
    let email = Email::new(&user_data.email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&user_data.password)? {
        tracing::info!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    encode_token(user.id, state.token_duration, &state.token_keys)
}
