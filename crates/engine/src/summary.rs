//! Derived spending figures.
//!
//! Everything here is computed on demand from a list of [`Expense`] rows;
//! nothing is stored. Amounts stay in integer minor units; only the
//! utilization percentage is floating point.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{categories, expenses::Expense};

/// How many buckets the "recent months" statement view keeps.
pub const RECENT_MONTHS: usize = 6;

/// Reduction percentages tried in order, smallest first.
const REDUCTION_STEPS_PCT: [u8; 3] = [10, 15, 20];
/// Applied when no step covers the excess.
const FALLBACK_REDUCTION_PCT: u8 = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingSuggestion {
    pub category: String,
    pub percentage: u8,
    pub savings_minor: i64,
    /// The category total after applying the reduction.
    pub new_total_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_spent_minor: i64,
    /// Negative when over budget.
    pub remaining_minor: i64,
    pub utilization_pct: f64,
    pub is_over_budget: bool,
    pub categories: Vec<CategoryTotal>,
    pub top_category: Option<CategoryTotal>,
    pub suggestion: Option<SavingSuggestion>,
}

/// One `YYYY-MM` bucket of the statement view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: String,
    pub total_minor: i64,
    pub categories: Vec<CategoryTotal>,
}

/// Computes the budget summary for a set of expenses against a monthly
/// income figure.
pub fn summarize(expenses: &[Expense], monthly_income_minor: i64) -> BudgetSummary {
    let total_spent_minor: i64 = expenses.iter().map(|e| e.amount_minor).sum();
    let remaining_minor = monthly_income_minor - total_spent_minor;
    let utilization_pct = if monthly_income_minor <= 0 {
        0.0
    } else {
        total_spent_minor as f64 / monthly_income_minor as f64 * 100.0
    };
    let is_over_budget = total_spent_minor > monthly_income_minor;

    let categories = category_totals(expenses.iter());
    let top_category = top_category(&categories).cloned();
    let suggestion = if is_over_budget {
        top_category
            .as_ref()
            .map(|top| suggest(top, total_spent_minor - monthly_income_minor))
    } else {
        None
    };

    BudgetSummary {
        total_spent_minor,
        remaining_minor,
        utilization_pct,
        is_over_budget,
        categories,
        top_category,
        suggestion,
    }
}

/// Buckets expenses by the `YYYY-MM` of their date, newest month first.
pub fn monthly_statement(expenses: &[Expense]) -> Vec<MonthBucket> {
    let mut buckets: HashMap<String, Vec<&Expense>> = HashMap::new();
    for expense in expenses {
        buckets
            .entry(month_key(expense.date))
            .or_default()
            .push(expense);
    }

    let mut months: Vec<MonthBucket> = buckets
        .into_iter()
        .map(|(month, rows)| MonthBucket {
            total_minor: rows.iter().map(|e| e.amount_minor).sum(),
            categories: category_totals(rows.into_iter()),
            month,
        })
        .collect();

    // Zero-padded keys make lexicographic and chronological order agree.
    months.sort_by(|a, b| b.month.cmp(&a.month));
    months
}

/// The statement view limited to the most recent [`RECENT_MONTHS`] buckets.
pub fn recent_months(expenses: &[Expense]) -> Vec<MonthBucket> {
    let mut months = monthly_statement(expenses);
    months.truncate(RECENT_MONTHS);
    months
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Per-label totals, in the canonical scan order: suggested categories first
/// in declared order, then free-form labels in first-encountered order.
/// Only labels present in the expense set appear.
fn category_totals<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    let mut extra_order: Vec<&str> = Vec::new();
    for expense in expenses {
        let label = expense.category.as_str();
        if !totals.contains_key(label) && categories::canonical_rank(label).is_none() {
            extra_order.push(label);
        }
        *totals.entry(label).or_insert(0) += expense.amount_minor;
    }

    let mut out = Vec::with_capacity(totals.len());
    for label in categories::SUGGESTED_CATEGORIES {
        if let Some(total_minor) = totals.get(label) {
            out.push(CategoryTotal {
                category: label.to_string(),
                total_minor: *total_minor,
            });
        }
    }
    for label in extra_order {
        if let Some(total_minor) = totals.get(label) {
            out.push(CategoryTotal {
                category: label.to_string(),
                total_minor: *total_minor,
            });
        }
    }
    out
}

/// Largest total wins; on ties the earlier label in scan order is kept.
fn top_category(categories: &[CategoryTotal]) -> Option<&CategoryTotal> {
    let mut top: Option<&CategoryTotal> = None;
    for candidate in categories {
        if top.is_none_or(|t| candidate.total_minor > t.total_minor) {
            top = Some(candidate);
        }
    }
    top
}

fn suggest(top: &CategoryTotal, excess_minor: i64) -> SavingSuggestion {
    for percentage in REDUCTION_STEPS_PCT {
        let savings_minor = top.total_minor * i64::from(percentage) / 100;
        if savings_minor >= excess_minor {
            return SavingSuggestion {
                category: top.category.clone(),
                percentage,
                savings_minor,
                new_total_minor: top.total_minor - savings_minor,
            };
        }
    }

    let savings_minor = top.total_minor * i64::from(FALLBACK_REDUCTION_PCT) / 100;
    SavingSuggestion {
        category: top.category.clone(),
        percentage: FALLBACK_REDUCTION_PCT,
        savings_minor,
        new_total_minor: top.total_minor - savings_minor,
    }
}
