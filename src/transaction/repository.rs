//! The transaction repository and the per-user cache of merged transactions.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    report::merge_transactions,
    transaction::{
        Expense, ExpenseId, Income, IncomeId, NewExpense, NewIncome, Transaction, db,
    },
};

/// Handles the storage and retrieval of a user's expenses and income.
pub trait TransactionRepository {
    /// Retrieve all of a user's expenses in the order they were created.
    fn list_expenses(&self, user_id: UserID) -> Result<Vec<Expense>, Error>;

    /// Retrieve all of a user's income in the order it was created.
    fn list_income(&self, user_id: UserID) -> Result<Vec<Income>, Error>;

    /// Save a new expense for the user.
    fn create_expense(&self, user_id: UserID, expense: NewExpense) -> Result<Expense, Error>;

    /// Replace an existing expense of the user.
    fn update_expense(
        &self,
        user_id: UserID,
        expense_id: ExpenseId,
        expense: NewExpense,
    ) -> Result<Expense, Error>;

    /// Delete an existing expense of the user.
    fn delete_expense(&self, user_id: UserID, expense_id: ExpenseId) -> Result<(), Error>;

    /// Save a new income for the user.
    fn create_income(&self, user_id: UserID, income: NewIncome) -> Result<Income, Error>;

    /// Replace an existing income of the user.
    fn update_income(
        &self,
        user_id: UserID,
        income_id: IncomeId,
        income: NewIncome,
    ) -> Result<Income, Error>;

    /// Delete an existing income of the user.
    fn delete_income(&self, user_id: UserID, income_id: IncomeId) -> Result<(), Error>;
}

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionRepository {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionRepository {
    /// Create a new repository for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionRepository for SQLiteTransactionRepository {
    fn list_expenses(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        db::get_expenses(user_id, &connection)
    }

    fn list_income(&self, user_id: UserID) -> Result<Vec<Income>, Error> {
        let connection = self.lock()?;
        db::get_income(user_id, &connection)
    }

    fn create_expense(&self, user_id: UserID, expense: NewExpense) -> Result<Expense, Error> {
        let connection = self.lock()?;
        db::create_expense(user_id, expense, &connection)
    }

    fn update_expense(
        &self,
        user_id: UserID,
        expense_id: ExpenseId,
        expense: NewExpense,
    ) -> Result<Expense, Error> {
        let connection = self.lock()?;
        db::update_expense(user_id, expense_id, expense, &connection)
    }

    fn delete_expense(&self, user_id: UserID, expense_id: ExpenseId) -> Result<(), Error> {
        let connection = self.lock()?;
        db::delete_expense(user_id, expense_id, &connection)
    }

    fn create_income(&self, user_id: UserID, income: NewIncome) -> Result<Income, Error> {
        let connection = self.lock()?;
        db::create_income(user_id, income, &connection)
    }

    fn update_income(
        &self,
        user_id: UserID,
        income_id: IncomeId,
        income: NewIncome,
    ) -> Result<Income, Error> {
        let connection = self.lock()?;
        db::update_income(user_id, income_id, income, &connection)
    }

    fn delete_income(&self, user_id: UserID, income_id: IncomeId) -> Result<(), Error> {
        let connection = self.lock()?;
        db::delete_income(user_id, income_id, &connection)
    }
}

/// Wraps a [TransactionRepository] and keeps each user's merged transaction
/// list until one of their transactions changes.
///
/// Mutations go through the cache so that the user's entry is dropped after
/// every successful write. Failed writes leave the entry in place.
#[derive(Debug, Clone)]
pub struct TransactionCache<R> {
    repository: R,
    entries: Arc<Mutex<HashMap<UserID, Arc<[Transaction]>>>>,
}

impl<R: TransactionRepository> TransactionCache<R> {
    /// Create an empty cache in front of `repository`.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the user's expenses and income merged into a single list, newest
    /// first.
    ///
    /// Both lists are fetched before merging, and a failure fetching either
    /// one fails the whole call without caching anything.
    pub fn transactions(&self, user_id: UserID) -> Result<Arc<[Transaction]>, Error> {
        // The lock is held across the fetch so an invalidation that happens
        // during the fetch cannot be overwritten by a stale list.
        let mut entries = self.lock_entries()?;

        if let Some(transactions) = entries.get(&user_id) {
            return Ok(Arc::clone(transactions));
        }

        let expenses = self.repository.list_expenses(user_id)?;
        let income = self.repository.list_income(user_id)?;
        let transactions: Arc<[Transaction]> = merge_transactions(expenses, income).into();

        tracing::debug!(
            "Cached {} transactions for user {user_id}",
            transactions.len()
        );
        entries.insert(user_id, Arc::clone(&transactions));

        Ok(transactions)
    }

    /// Retrieve the user's expenses straight from the repository.
    pub fn expenses(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        self.repository.list_expenses(user_id)
    }

    /// Retrieve the user's income straight from the repository.
    pub fn income(&self, user_id: UserID) -> Result<Vec<Income>, Error> {
        self.repository.list_income(user_id)
    }

    /// Drop the cached transactions of the user.
    pub fn invalidate(&self, user_id: UserID) -> Result<(), Error> {
        if self.lock_entries()?.remove(&user_id).is_some() {
            tracing::debug!("Invalidated cached transactions for user {user_id}");
        }

        Ok(())
    }

    /// Save a new expense, see [TransactionRepository::create_expense].
    pub fn create_expense(&self, user_id: UserID, expense: NewExpense) -> Result<Expense, Error> {
        let expense = self.repository.create_expense(user_id, expense)?;
        self.invalidate(user_id)?;
        Ok(expense)
    }

    /// Replace an expense, see [TransactionRepository::update_expense].
    pub fn update_expense(
        &self,
        user_id: UserID,
        expense_id: ExpenseId,
        expense: NewExpense,
    ) -> Result<Expense, Error> {
        let expense = self
            .repository
            .update_expense(user_id, expense_id, expense)?;
        self.invalidate(user_id)?;
        Ok(expense)
    }

    /// Delete an expense, see [TransactionRepository::delete_expense].
    pub fn delete_expense(&self, user_id: UserID, expense_id: ExpenseId) -> Result<(), Error> {
        self.repository.delete_expense(user_id, expense_id)?;
        self.invalidate(user_id)
    }

    /// Save a new income, see [TransactionRepository::create_income].
    pub fn create_income(&self, user_id: UserID, income: NewIncome) -> Result<Income, Error> {
        let income = self.repository.create_income(user_id, income)?;
        self.invalidate(user_id)?;
        Ok(income)
    }

    /// Replace an income, see [TransactionRepository::update_income].
    pub fn update_income(
        &self,
        user_id: UserID,
        income_id: IncomeId,
        income: NewIncome,
    ) -> Result<Income, Error> {
        let income = self.repository.update_income(user_id, income_id, income)?;
        self.invalidate(user_id)?;
        Ok(income)
    }

    /// Delete an income, see [TransactionRepository::delete_income].
    pub fn delete_income(&self, user_id: UserID, income_id: IncomeId) -> Result<(), Error> {
        self.repository.delete_income(user_id, income_id)?;
        self.invalidate(user_id)
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, HashMap<UserID, Arc<[Transaction]>>>, Error> {
        self.entries.lock().map_err(|error| {
            tracing::error!("could not acquire transaction cache lock: {error}");
            Error::CacheLockError
        })
    }
}

/// The state needed to read and change a user's transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The cached transaction repository.
    pub transactions: TransactionCache<SQLiteTransactionRepository>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}


#[cfg(test)]
mod sqlite_repository_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{Email, PasswordHash, UserID, create_user},
        db::initialize,
        transaction::{NewExpense, NewIncome, SQLiteTransactionRepository, TransactionRepository},
    };

    const TODAY: time::Date = date!(2024 - 03 - 10);

    fn get_test_repository() -> SQLiteTransactionRepository {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        create_user(
            "Test User",
            Email::new_unchecked("test@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .expect("Could not create test user");

        SQLiteTransactionRepository::new(Arc::new(Mutex::new(connection)))
    }

    #[test]
    fn expense_lifecycle() {
        let repository = get_test_repository();
        let user_id = UserID::new(1);
        let expense = repository
            .create_expense(
                user_id,
                NewExpense::new(5.0, "Food", None, date!(2024 - 03 - 01), TODAY).unwrap(),
            )
            .unwrap();
        assert_eq!(repository.list_expenses(user_id), Ok(vec![expense.clone()]));

        let updated = repository
            .update_expense(
                user_id,
                expense.id,
                NewExpense::new(7.0, "Rent", None, date!(2024 - 03 - 02), TODAY).unwrap(),
            )
            .unwrap();
        assert_eq!(repository.list_expenses(user_id), Ok(vec![updated]));

        repository.delete_expense(user_id, expense.id).unwrap();
        assert_eq!(repository.list_expenses(user_id), Ok(vec![]));
        assert_eq!(
            repository.delete_expense(user_id, expense.id),
            Err(Error::DeleteMissingExpense)
        );
    }

    #[test]
    fn income_lifecycle() {
        let repository = get_test_repository();
        let user_id = UserID::new(1);
        let income = repository
            .create_income(
                user_id,
                NewIncome::new(100.0, "Salary", date!(2024 - 03 - 01), TODAY).unwrap(),
            )
            .unwrap();
        assert_eq!(repository.list_income(user_id), Ok(vec![income.clone()]));

        let updated = repository
            .update_income(
                user_id,
                income.id,
                NewIncome::new(120.0, "Bonus", date!(2024 - 03 - 02), TODAY).unwrap(),
            )
            .unwrap();
        assert_eq!(repository.list_income(user_id), Ok(vec![updated]));

        repository.delete_income(user_id, income.id).unwrap();
        assert_eq!(repository.list_income(user_id), Ok(vec![]));
        assert_eq!(
            repository.update_income(
                user_id,
                income.id,
                NewIncome::new(1.0, "Salary", date!(2024 - 03 - 02), TODAY).unwrap(),
            ),
            Err(Error::UpdateMissingIncome)
        );
    }
}
