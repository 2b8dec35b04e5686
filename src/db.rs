//! Sets up the application's database.

use rusqlite::Connection;

use crate::{
    Error,
    auth::create_user_table,
    transaction::{create_expense_table, create_income_table},
};

/// Create the all of the database tables for the application.
///
/// The tables are created inside a single database transaction so a failure
/// leaves the database untouched.
///
/// # Errors
/// This function may return a [rusqlite::Error] if something went wrong creating the tables.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
