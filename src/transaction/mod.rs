//! Expenses and income.
//!
//! This module contains everything related to a user's transactions:
//! - The `Expense`, `Income` and `Transaction` models and their validation
//! - Database functions for storing and querying expenses and income
//! - The repository and the per-user cache the reports read from
//! - The JSON endpoints for managing expenses and income

mod db;
mod domain;
mod expense_endpoints;
mod income_endpoints;
mod repository;

pub use db::{create_expense, create_expense_table, create_income, create_income_table};
pub use domain::{
    Expense, ExpenseForm, ExpenseId, Income, IncomeForm, IncomeId, MAX_AMOUNT, NewExpense,
    NewIncome, OTHER_SUBCATEGORY, Transaction, TransactionKind,
};
pub use expense_endpoints::{
    create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
    update_expense_endpoint,
};
pub use income_endpoints::{
    create_income_endpoint, delete_income_endpoint, list_income_endpoint, update_income_endpoint,
};
pub use repository::{
    SQLiteTransactionRepository, TransactionCache, TransactionRepository, TransactionState,
};

pub(crate) use domain::date_format;
