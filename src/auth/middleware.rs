//! Authentication middleware that validates bearer tokens.

use axum::{
    extract::{FromRef, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    AppState, Error,
    auth::{
        UserID,
        token::{TokenKeys, decode_token},
    },
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The keys for verifying bearer tokens.
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
        }
    }
}

/// Get the ID of the user from the bearer token in `headers`.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the authorization header is missing, is
/// not a bearer token, or the token does not verify.
pub(crate) fn user_id_from_headers(
    headers: &HeaderMap,
    token_keys: &TokenKeys,
) -> Result<UserID, Error> {
    let Authorization(bearer) = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(Error::InvalidToken)?;

    decode_token(bearer.token(), token_keys).map(|claims| claims.user_id)
}

/// Middleware function that checks for a valid bearer token.
///
/// The user ID is placed into the request and the request executed normally
/// if the token is valid, otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match user_id_from_headers(request.headers(), &state.token_keys) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    request.extensions_mut().insert(user_id);
    next.run(request).await
}
