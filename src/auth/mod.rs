//! User accounts, passwords and bearer token authentication.

mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod session;
mod token;
mod user;

pub use log_in::{AuthResponse, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::register_user;
pub use session::get_session;
pub use token::{DEFAULT_TOKEN_DURATION, TokenKeys, encode_token};
pub use user::{
    Email, User, UserID, create_user, create_user_table, get_user_by_email, get_user_by_id,
    update_password,
};
