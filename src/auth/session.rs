//! Reports whether the client holds a valid token.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::HeaderMap,
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    auth::{TokenKeys, User, get_user_by_id, middleware::user_id_from_headers},
};

/// The state needed to look up the session's user.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The keys for verifying bearer tokens.
    pub token_keys: TokenKeys,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of the session response.
#[derive(Debug, Serialize)]
pub struct Session {
    /// Whether the request carried a valid token for an existing user.
    pub is_logged: bool,
    /// The logged in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Handler for session checks via the GET method.
///
/// Never responds with 401; a missing or invalid token is reported as
/// `is_logged: false`.
pub async fn get_session(State(state): State<SessionState>, headers: HeaderMap) -> Json<Session> {
    let user = match session_user(&state, &headers) {
        Ok(user) => Some(user),
        Err(Error::InvalidToken | Error::NotFound) => None,
        Err(error) => {
            tracing::error!("Could not check session: {error}");
            None
        }
    };

    Json(Session {
        is_logged: user.is_some(),
        user,
    })
}

fn session_user(state: &SessionState, headers: &HeaderMap) -> Result<User, Error> {
    let user_id = user_id_from_headers(headers, &state.token_keys)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)
}
