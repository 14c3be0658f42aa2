use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub category: String,
        /// Amount in integer minor units (cents).
        pub amount_minor: i64,
        /// Calendar date, serialized as `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub description: Option<String>,
        /// Total installment count, when this row belongs to a split purchase.
        pub installments: Option<u32>,
        /// 1-based index within the installment batch.
        pub installment_number: Option<u32>,
        pub original_purchase_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub category: String,
        /// Must be > 0, in minor units.
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: Option<String>,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub success: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstallmentNew {
        pub category: String,
        /// Total purchase amount in minor units; split across the batch.
        pub amount_minor: i64,
        /// Number of installments, 1 to 36.
        pub installments: u32,
        pub purchase_date: NaiveDate,
        pub description: Option<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        /// Calendar month key, `YYYY-MM`.
        pub month: String,
        pub monthly_income_minor: i64,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSet {
        /// Must be > 0, in minor units.
        pub monthly_income_minor: i64,
    }
}

pub mod summary {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SavingSuggestionView {
        /// Category the reduction applies to (the top-spending one).
        pub category: String,
        pub percentage: u8,
        pub savings_minor: i64,
        /// Category total after applying the reduction.
        pub new_total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummaryView {
        pub total_spent_minor: i64,
        /// May be negative when over budget.
        pub remaining_minor: i64,
        pub utilization_pct: f64,
        pub is_over_budget: bool,
        pub categories: Vec<CategoryTotalView>,
        pub top_category: Option<CategoryTotalView>,
        pub suggestion: Option<SavingSuggestionView>,
    }
}

pub mod statement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        /// Bucket key, `YYYY-MM`.
        pub month: String,
        pub total_minor: i64,
        pub categories: Vec<summary::CategoryTotalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementResponse {
        /// Newest month first.
        pub months: Vec<MonthView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatementQuery {
        /// When true, only the most recent months are returned.
        pub recent: Option<bool>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<String>,
    }
}
