//! Core transaction domain types.
//!
//! Expenses and income are stored separately and have independent ID spaces.
//! [Transaction] is the tagged union the reports work on.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID};

time::serde::format_description!(pub(crate) date_format, Date, "[year]-[month]-[day]");

/// The sub-category given to expenses that were saved without one.
pub const OTHER_SUBCATEGORY: &str = "Other";

/// The largest amount a single transaction may have.
///
/// Keeps every sum the reports calculate finite.
pub const MAX_AMOUNT: f64 = 1e12;

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Database identifier for an income.
pub type IncomeId = i64;

/// Money spent by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, unique among expenses.
    pub id: ExpenseId,
    /// How much was spent, never negative.
    pub amount: f64,
    /// What the money was spent on, e.g. "Food".
    #[serde(rename = "categories")]
    pub category: String,
    /// A finer grained label within the category, e.g. "Groceries".
    #[serde(rename = "subcategories")]
    pub subcategory: String,
    /// When the money was spent.
    #[serde(with = "date_format")]
    pub date: Date,
    /// The user that owns the expense.
    pub user_id: UserID,
}

/// Money received by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// The ID of the income, unique among income.
    pub id: IncomeId,
    /// How much was received, never negative.
    pub amount: f64,
    /// Where the money came from, e.g. "Salary".
    #[serde(rename = "inc_source")]
    pub source: String,
    /// When the money was received.
    #[serde(with = "date_format")]
    pub date: Date,
    /// The user that owns the income.
    pub user_id: UserID,
}

/// Whether a transaction is an expense or an income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money going out.
    Expense,
    /// Money coming in.
    Income,
}

/// An expense or an income, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transaction {
    /// Money going out.
    Expense(Expense),
    /// Money coming in.
    Income(Income),
}

impl Transaction {
    /// The kind of the transaction.
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Expense(_) => TransactionKind::Expense,
            Transaction::Income(_) => TransactionKind::Income,
        }
    }

    /// The amount of money moved.
    pub fn amount(&self) -> f64 {
        match self {
            Transaction::Expense(expense) => expense.amount,
            Transaction::Income(income) => income.amount,
        }
    }

    /// The date the money moved.
    pub fn date(&self) -> Date {
        match self {
            Transaction::Expense(expense) => expense.date,
            Transaction::Income(income) => income.date,
        }
    }
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub(crate) amount: f64,
    pub(crate) category: String,
    pub(crate) subcategory: String,
    pub(crate) date: Date,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// A missing or blank `subcategory` is replaced with [OTHER_SUBCATEGORY].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is not greater than zero,
    /// - `category` is blank,
    /// - or `date` is after `today`.
    pub fn new(
        amount: f64,
        category: &str,
        subcategory: Option<&str>,
        date: Date,
        today: Date,
    ) -> Result<Self, Error> {
        let amount = validate_amount(amount)?;
        let date = validate_date(date, today)?;

        let category = category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        let subcategory = subcategory
            .map(str::trim)
            .filter(|subcategory| !subcategory.is_empty())
            .unwrap_or(OTHER_SUBCATEGORY);

        Ok(Self {
            amount,
            category: category.to_owned(),
            subcategory: subcategory.to_owned(),
            date,
        })
    }
}

/// A validated income that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub(crate) amount: f64,
    pub(crate) source: String,
    pub(crate) date: Date,
}

impl NewIncome {
    /// Validate the fields of a new income.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is not greater than zero,
    /// - `source` is blank,
    /// - or `date` is after `today`.
    pub fn new(amount: f64, source: &str, date: Date, today: Date) -> Result<Self, Error> {
        let amount = validate_amount(amount)?;
        let date = validate_date(date, today)?;

        let source = source.trim();
        if source.is_empty() {
            return Err(Error::EmptyIncomeSource);
        }

        Ok(Self {
            amount,
            source: source.to_owned(),
            date,
        })
    }
}

/// The JSON body for creating or updating an expense.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// How much was spent.
    pub amount: f64,
    /// The category of the expense.
    pub categories: String,
    /// Defaults to [OTHER_SUBCATEGORY] when missing or blank.
    #[serde(default)]
    pub subcategories: Option<String>,
    /// The date as `YYYY-MM-DD`.
    #[serde(with = "date_format")]
    pub date: Date,
}

impl ExpenseForm {
    /// Validate the form, see [NewExpense::new].
    pub fn validate(self, today: Date) -> Result<NewExpense, Error> {
        NewExpense::new(
            self.amount,
            &self.categories,
            self.subcategories.as_deref(),
            self.date,
            today,
        )
    }
}

/// The JSON body for creating or updating an income.
#[derive(Debug, Serialize, Deserialize)]
pub struct IncomeForm {
    /// How much was received.
    pub amount: f64,
    /// Where the money came from.
    pub inc_source: String,
    /// The date as `YYYY-MM-DD`.
    #[serde(with = "date_format")]
    pub date: Date,
}

impl IncomeForm {
    /// Validate the form, see [NewIncome::new].
    pub fn validate(self, today: Date) -> Result<NewIncome, Error> {
        NewIncome::new(self.amount, &self.inc_source, self.date, today)
    }
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 && amount <= MAX_AMOUNT {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

fn validate_date(date: Date, today: Date) -> Result<Date, Error> {
    if date > today {
        Err(Error::FutureDate(date))
    } else {
        Ok(date)
    }
}
