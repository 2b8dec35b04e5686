use rusqlite::Connection;

use crate::{
    AppState,
    auth::{
        DEFAULT_TOKEN_DURATION, Email, PasswordHash, User, UserID, ValidatedPassword, create_user,
        encode_token,
    },
};

/// A password strong enough to pass registration.
pub(crate) const TEST_PASSWORD: &str = "correct-horse-battery-staple-42";

/// bcrypt's minimum cost keeps hashing fast in tests.
const TEST_HASH_COST: u32 = 4;

pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let mut state = AppState::new(connection, "foobar", "Etc/UTC", DEFAULT_TOKEN_DURATION)
        .expect("Could not create app state");
    state.password_hash_cost = TEST_HASH_COST;

    state
}

#[track_caller]
pub(crate) fn create_test_user(state: &AppState) -> User {
    create_test_user_with_email(state, "test@example.com")
}

#[track_caller]
pub(crate) fn create_test_user_with_email(state: &AppState, email: &str) -> User {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        TEST_HASH_COST,
    )
    .expect("Could not hash test password");

    create_user(
        "Test User",
        Email::new_unchecked(email),
        password_hash,
        &state.db_connection.lock().unwrap(),
    )
    .expect("Could not create test user")
}

#[track_caller]
pub(crate) fn log_in_test_user(state: &AppState, user_id: UserID) -> String {
    encode_token(user_id, state.token_duration, &state.token_keys)
        .expect("Could not create test token")
}
