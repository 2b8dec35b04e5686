use std::collections::HashMap;

use serde::Serialize;

use crate::{
    report::Drilldown,
    transaction::{OTHER_SUBCATEGORY, Transaction},
};

/// The summed expenses of one category or sub-category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category or sub-category.
    pub label: String,
    /// The summed expense amounts.
    pub total: f64,
}

/// Sum expenses per category.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    sum_by_label(transactions.iter().filter_map(|transaction| match transaction {
        Transaction::Expense(expense) => Some((expense.category.as_str(), expense.amount)),
        Transaction::Income(_) => None,
    }))
}

/// Sum the expenses in `parent` per sub-category.
pub fn group_by_subcategory(transactions: &[Transaction], parent: &str) -> Vec<CategoryTotal> {
    sum_by_label(transactions.iter().filter_map(|transaction| match transaction {
        Transaction::Expense(expense) if expense.category == parent => {
            Some((expense.subcategory.as_str(), expense.amount))
        }
        _ => None,
    }))
}

/// Group expenses at the level selected by `drilldown`.
pub fn group_by_drilldown(transactions: &[Transaction], drilldown: &Drilldown) -> Vec<CategoryTotal> {
    match drilldown {
        Drilldown::Category => group_by_category(transactions),
        Drilldown::Subcategory { parent } => group_by_subcategory(transactions, parent),
    }
}

/// Labels are sorted alphabetically with "Other" last.
fn sum_by_label<'a>(amounts: impl Iterator<Item = (&'a str, f64)>) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for (label, amount) in amounts {
        *totals.entry(label).or_insert(0.0) += amount;
    }

    let mut labels: Vec<&str> = totals
        .keys()
        .copied()
        .filter(|&label| label != OTHER_SUBCATEGORY)
        .collect();
    labels.sort();

    if totals.contains_key(OTHER_SUBCATEGORY) {
        labels.push(OTHER_SUBCATEGORY);
    }

    labels
        .into_iter()
        .map(|label| CategoryTotal {
            label: label.to_owned(),
            total: totals[label],
        })
        .collect()
}
