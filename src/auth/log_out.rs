//! Handles log-out requests.
//!
//! Tokens are not stored on the server, so logging out only tells the client
//! to drop its token. The token stays valid until it expires.

use axum::Json;

use crate::auth::AuthResponse;

/// Handler for log-out requests via the POST method.
pub async fn post_log_out() -> Json<AuthResponse> {
    Json(AuthResponse::success("Logged out."))
}
