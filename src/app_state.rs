//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    auth::{PasswordHash, TokenKeys},
    db::initialize,
    transaction::{SQLiteTransactionRepository, TransactionCache},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The keys for signing and verifying bearer tokens.
    pub token_keys: TokenKeys,

    /// The duration for which bearer tokens are valid.
    pub token_duration: Duration,

    /// The number of bcrypt rounds used when hashing new passwords.
    pub password_hash_cost: u32,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The users' transactions, cached per user.
    pub transactions: TransactionCache<SQLiteTransactionRepository>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        local_timezone: &str,
        token_duration: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let repository = SQLiteTransactionRepository::new(connection.clone());

        Ok(Self {
            token_keys: TokenKeys::new(token_secret),
            token_duration,
            password_hash_cost: PasswordHash::DEFAULT_COST,
            local_timezone: local_timezone.to_owned(),
            db_connection: connection,
            transactions: TransactionCache::new(repository),
        })
    }
}
