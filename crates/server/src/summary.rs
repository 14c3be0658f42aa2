//! Spending report endpoints
//!
//! These serve the derived figures: the budget summary (totals, utilization,
//! saving suggestion) and the monthly statement.

use api_types::{
    statement::{MonthView, StatementQuery, StatementResponse},
    summary::{BudgetSummaryView, CategoryTotalView, SavingSuggestionView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, budget, server::ServerState, user};

fn map_category(total: engine::CategoryTotal) -> CategoryTotalView {
    CategoryTotalView {
        category: total.category,
        total_minor: total.total_minor,
    }
}

fn map_summary(summary: engine::BudgetSummary) -> BudgetSummaryView {
    BudgetSummaryView {
        total_spent_minor: summary.total_spent_minor,
        remaining_minor: summary.remaining_minor,
        utilization_pct: summary.utilization_pct,
        is_over_budget: summary.is_over_budget,
        categories: summary.categories.into_iter().map(map_category).collect(),
        top_category: summary.top_category.map(map_category),
        suggestion: summary.suggestion.map(|s| SavingSuggestionView {
            category: s.category,
            percentage: s.percentage,
            savings_minor: s.savings_minor,
            new_total_minor: s.new_total_minor,
        }),
    }
}

fn map_month(month: engine::MonthBucket) -> MonthView {
    MonthView {
        month: month.month,
        total_minor: month.total_minor,
        categories: month.categories.into_iter().map(map_category).collect(),
    }
}

/// Aggregates the caller's expenses against the current-month budget.
pub async fn get_summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetSummaryView>, ServerError> {
    let budget = budget::current_budget(&state, &user.username).await?;
    let expenses = state.engine.list_expenses(&user.username).await;

    let summary = engine::summarize(&expenses, budget.monthly_income_minor);
    Ok(Json(map_summary(summary)))
}

/// Monthly statement buckets, newest first; `?recent=true` keeps only the
/// latest months.
pub async fn statement(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StatementQuery>,
) -> Json<StatementResponse> {
    let expenses = state.engine.list_expenses(&user.username).await;
    let months = if query.recent.unwrap_or(false) {
        engine::recent_months(&expenses)
    } else {
        engine::monthly_statement(&expenses)
    };

    Json(StatementResponse {
        months: months.into_iter().map(map_month).collect(),
    })
}
