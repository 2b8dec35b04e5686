//! Database operations for expenses and income.
//!
//! Every query is scoped to a user, so a user can never read or change another
//! user's transactions by guessing IDs.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    transaction::{
        Expense, ExpenseId, Income, IncomeId, MAX_AMOUNT, NewExpense, NewIncome, OTHER_SUBCATEGORY,
    },
};

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            subcategory TEXT,
            date TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_id ON expense(user_id);",
    )?;

    Ok(())
}

/// Initialize the income table and indexes.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            source TEXT NOT NULL,
            date TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_income_user_id ON income(user_id);",
    )?;

    Ok(())
}

/// Create an expense for `user_id` and return it with its generated ID.
pub fn create_expense(
    user_id: UserID,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (amount, category, subcategory, date, user_id)
        VALUES (?1, ?2, ?3, ?4, ?5);",
        (
            expense.amount,
            &expense.category,
            &expense.subcategory,
            expense.date,
            user_id.as_i64(),
        ),
    )?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        amount: expense.amount,
        category: expense.category,
        subcategory: expense.subcategory,
        date: expense.date,
        user_id,
    })
}

/// Retrieve all of a user's expenses in the order they were created.
///
/// # Errors
///
/// Returns [Error::MalformedRecord] if a stored expense has an unreadable date
/// or an invalid amount.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, amount, category, COALESCE(NULLIF(TRIM(subcategory), ''), :other), date, user_id
            FROM expense
            WHERE user_id = :user_id
            ORDER BY id ASC;",
        )?
        .query_map(
            rusqlite::named_params! {":user_id": user_id.as_i64(), ":other": OTHER_SUBCATEGORY},
            map_expense_row,
        )?
        .map(|maybe_expense| -> Result<Expense, Error> {
            let expense = maybe_expense?;
            check_stored_amount(expense.amount, "expense", expense.id)?;
            Ok(expense)
        })
        .collect()
}

/// Replace the fields of the expense `expense_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingExpense] if the user has no such expense.
pub fn update_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET amount = ?1, category = ?2, subcategory = ?3, date = ?4
        WHERE id = ?5 AND user_id = ?6",
        (
            expense.amount,
            &expense.category,
            &expense.subcategory,
            expense.date,
            expense_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(Expense {
        id: expense_id,
        amount: expense.amount,
        category: expense.category,
        subcategory: expense.subcategory,
        date: expense.date,
        user_id,
    })
}

/// Delete the expense `expense_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingExpense] if the user has no such expense.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Create an income for `user_id` and return it with its generated ID.
pub fn create_income(
    user_id: UserID,
    income: NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    connection.execute(
        "INSERT INTO income (amount, source, date, user_id) VALUES (?1, ?2, ?3, ?4);",
        (income.amount, &income.source, income.date, user_id.as_i64()),
    )?;

    Ok(Income {
        id: connection.last_insert_rowid(),
        amount: income.amount,
        source: income.source,
        date: income.date,
        user_id,
    })
}

/// Retrieve all of a user's income in the order it was created.
///
/// # Errors
///
/// Returns [Error::MalformedRecord] if a stored income has an unreadable date
/// or an invalid amount.
pub fn get_income(user_id: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, amount, source, date, user_id
            FROM income
            WHERE user_id = :user_id
            ORDER BY id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_income_row)?
        .map(|maybe_income| -> Result<Income, Error> {
            let income = maybe_income?;
            check_stored_amount(income.amount, "income", income.id)?;
            Ok(income)
        })
        .collect()
}

/// Replace the fields of the income `income_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingIncome] if the user has no such income.
pub fn update_income(
    user_id: UserID,
    income_id: IncomeId,
    income: NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    let rows_affected = connection.execute(
        "UPDATE income SET amount = ?1, source = ?2, date = ?3 WHERE id = ?4 AND user_id = ?5",
        (
            income.amount,
            &income.source,
            income.date,
            income_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingIncome);
    }

    Ok(Income {
        id: income_id,
        amount: income.amount,
        source: income.source,
        date: income.date,
        user_id,
    })
}

/// Delete the income `income_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingIncome] if the user has no such income.
pub fn delete_income(
    user_id: UserID,
    income_id: IncomeId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
        (income_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}

fn check_stored_amount(amount: f64, table: &str, id: i64) -> Result<(), Error> {
    if amount.is_finite() && (0.0..=MAX_AMOUNT).contains(&amount) {
        return Ok(());
    }

    tracing::error!("Stored {table} {id} has the invalid amount {amount}");
    Err(Error::MalformedRecord(format!(
        "{table} {id} has the invalid amount {amount}"
    )))
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        category: row.get(2)?,
        subcategory: row.get(3)?,
        date: row.get(4)?,
        user_id: UserID::new(row.get(5)?),
    })
}

fn map_income_row(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        amount: row.get(1)?,
        source: row.get(2)?,
        date: row.get(3)?,
        user_id: UserID::new(row.get(4)?),
    })
}


#[cfg(test)]
mod income_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{Email, PasswordHash, UserID, create_user},
        db::initialize,
        transaction::NewIncome,
    };

    use super::{create_income, delete_income, get_income, update_income};

    const TODAY: time::Date = date!(2024 - 03 - 10);

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        // Users 1 and 2.
        for email in ["one@example.com", "two@example.com"] {
            create_user(
                "Test User",
                Email::new_unchecked(email),
                PasswordHash::new_unchecked("hunter2"),
                &connection,
            )
            .expect("Could not create test user");
        }

        connection
    }

    fn new_income(amount: f64) -> NewIncome {
        NewIncome::new(amount, "Salary", date!(2024 - 03 - 01), TODAY).unwrap()
    }

    #[test]
    fn create_and_get_income() {
        let connection = get_test_db_connection();
        let user_id = UserID::new(1);

        let income = create_income(user_id, new_income(100.0), &connection).unwrap();

        assert_eq!(get_income(user_id, &connection), Ok(vec![income]));
    }

    #[test]
    fn get_income_fails_on_malformed_date() {
        let connection = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO income (amount, source, date, user_id)
                VALUES (5.0, 'Salary', '2024-13-45', 1)",
                (),
            )
            .unwrap();

        let result = get_income(UserID::new(1), &connection);

        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn get_income_fails_on_amount_above_max() {
        let connection = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO income (amount, source, date, user_id)
                VALUES (1.7e308, 'Salary', '2024-03-01', 1)",
                (),
            )
            .unwrap();

        let result = get_income(UserID::new(1), &connection);

        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn update_missing_income_fails() {
        let connection = get_test_db_connection();

        let result = update_income(UserID::new(1), 42, new_income(1.0), &connection);

        assert_eq!(result, Err(Error::UpdateMissingIncome));
    }

    #[test]
    fn delete_income_of_other_user_fails() {
        let connection = get_test_db_connection();
        let income = create_income(UserID::new(1), new_income(100.0), &connection).unwrap();

        let result = delete_income(UserID::new(2), income.id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingIncome));
        assert_eq!(get_income(UserID::new(1), &connection), Ok(vec![income]));
    }
}
