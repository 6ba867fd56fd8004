//! Expense ledger aggregates, recomputed from the expense list on demand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::{Expense, ExpenseCategory};

/// Totals over one trip's expenses. Amounts in different currencies are never
/// added together here; see
/// [`CurrencyConverter::total_in`](crate::currency::CurrencyConverter::total_in)
/// for a single-currency total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
  pub count:       usize,
  pub by_currency: BTreeMap<String, f64>,
  /// Category → currency → total.
  pub by_category: BTreeMap<ExpenseCategory, BTreeMap<String, f64>>,
}

impl ExpenseSummary {
  pub fn from_expenses(expenses: &[Expense]) -> Self {
    let mut summary = Self { count: expenses.len(), ..Default::default() };
    for e in expenses {
      *summary.by_currency.entry(e.currency.clone()).or_default() += e.amount;
      *summary
        .by_category
        .entry(e.category)
        .or_default()
        .entry(e.currency.clone())
        .or_default() += e.amount;
    }
    summary
  }
}

/// Expenses sorted for display: newest date first, ties in insertion order.
pub fn newest_first(expenses: &[Expense]) -> Vec<Expense> {
  let mut sorted = expenses.to_vec();
  sorted.sort_by(|a, b| b.date.cmp(&a.date));
  sorted
}
