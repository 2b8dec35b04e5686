use crate::transaction::{Expense, Income, Transaction};

/// Combine a user's expenses and income into one list, newest first.
///
/// The sort is stable: transactions on the same date keep the order of their
/// source list, with expenses before income.
pub fn merge_transactions(expenses: Vec<Expense>, income: Vec<Income>) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = expenses
        .into_iter()
        .map(Transaction::Expense)
        .chain(income.into_iter().map(Transaction::Income))
        .collect();

    transactions.sort_by(|a, b| b.date().cmp(&a.date()));

    transactions
}

#[cfg(test)]
mod merge_tests {
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        report::merge_transactions,
        transaction::{Expense, Income, Transaction, TransactionKind},
    };

    fn expense(id: i64, date: Date) -> Expense {
        Expense {
            id,
            amount: 1.0,
            category: "Food".to_owned(),
            subcategory: "Other".to_owned(),
            date,
            user_id: UserID::new(1),
        }
    }

    fn income(id: i64, date: Date) -> Income {
        Income {
            id,
            amount: 1.0,
            source: "Salary".to_owned(),
            date,
            user_id: UserID::new(1),
        }
    }

    #[test]
    fn sorts_by_date_descending() {
        let merged = merge_transactions(
            vec![
                expense(1, date!(2024 - 03 - 01)),
                expense(2, date!(2024 - 03 - 05)),
            ],
            vec![income(1, date!(2024 - 03 - 03))],
        );

        let dates: Vec<Date> = merged.iter().map(Transaction::date).collect();
        assert_eq!(
            dates,
            [
                date!(2024 - 03 - 05),
                date!(2024 - 03 - 03),
                date!(2024 - 03 - 01)
            ]
        );
    }

    #[test]
    fn equal_dates_keep_source_order() {
        let day = date!(2024 - 03 - 01);

        let merged = merge_transactions(
            vec![expense(7, day), expense(3, day)],
            vec![income(9, day), income(2, day)],
        );

        assert_eq!(
            merged,
            vec![
                Transaction::Expense(expense(7, day)),
                Transaction::Expense(expense(3, day)),
                Transaction::Income(income(9, day)),
                Transaction::Income(income(2, day)),
            ]
        );
    }

    #[test]
    fn shared_ids_are_not_deduplicated() {
        let day = date!(2024 - 03 - 01);

        let merged = merge_transactions(vec![expense(1, day)], vec![income(1, day)]);

        let kinds: Vec<TransactionKind> = merged.iter().map(Transaction::kind).collect();
        assert_eq!(kinds, [TransactionKind::Expense, TransactionKind::Income]);
    }

    #[test]
    fn empty_inputs_give_empty_output() {
        assert!(merge_transactions(vec![], vec![]).is_empty());
    }
}
