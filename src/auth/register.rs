//! Handles requests to register a new user.

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

use crate::{
    AppState, Error,
    auth::{AuthResponse, Email, PasswordHash, ValidatedPassword, create_user},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The number of bcrypt rounds used when hashing the password.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Handler for registration requests via the POST method.
///
/// Responds with 201 once the user has been created. The new user must still
/// log in to get a token.
pub async fn register_user(
    State(state): State<RegistrationState>,
    WithRejection(Json(user_data), _): WithRejection<Json<RegisterForm>, Error>,
) -> Response {
    match register(&state, &user_data) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(AuthResponse::success(
                "Account created, you can now log in.",
            )),
        )
            .into_response(),
        Err(
            error @ (Error::InvalidEmail(_)
            | Error::EmptyName
            | Error::TooWeak(_)
            | Error::DuplicateEmail),
        ) => (
            error.status_code(),
            Json(AuthResponse::failure(&error.to_string())),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unhandled error occurred while registering a user: {error}");
            error.into_response()
        }
    }
}

fn register(state: &RegistrationState, user_data: &RegisterForm) -> Result<(), Error> {
    let email = Email::new(&user_data.email)?;

    if user_data.name.trim().is_empty() {
        return Err(Error::EmptyName);
    }

    let validated_password =
        ValidatedPassword::new(&user_data.password, &[user_data.name.as_str(), email.as_ref()])?;
    let password_hash = PasswordHash::new(validated_password, state.password_hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = create_user(&user_data.name, email, password_hash, &connection)?;
    tracing::info!("Registered user {}", user.id);

    Ok(())
}
