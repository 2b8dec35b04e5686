use serde::Serialize;
use time::Date;

use crate::transaction::Transaction;

/// The headline figures of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// The balance, or zero if the user has spent more than they earned.
    pub income_left: f64,
    /// The balance as a percentage of total income.
    ///
    /// `None` when there is no income, since the percentage is undefined.
    pub percentage_budget_left: Option<f64>,
    /// The sum of expenses in the calendar month of the reference date.
    pub spent_this_month: f64,
}

/// Calculate the summary figures of `transactions`.
///
/// `today` selects the month used for [Summary::spent_this_month].
pub fn summarize(transactions: &[Transaction], today: Date) -> Summary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut spent_this_month = 0.0;

    for transaction in transactions {
        match transaction {
            Transaction::Income(income) => total_income += income.amount,
            Transaction::Expense(expense) => {
                total_expense += expense.amount;

                if expense.date.year() == today.year() && expense.date.month() == today.month() {
                    spent_this_month += expense.amount;
                }
            }
        }
    }

    let balance = total_income - total_expense;
    let percentage_budget_left = if total_income > 0.0 {
        Some(100.0 * balance / total_income)
    } else {
        None
    };

    Summary {
        total_income,
        total_expense,
        balance,
        income_left: balance.max(0.0),
        percentage_budget_left,
        spent_this_month,
    }
}
