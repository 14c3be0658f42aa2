//! Budget API endpoints

use api_types::budget::{BudgetSet, BudgetView};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{ServerError, server::ServerState, user};
use engine::DEFAULT_MONTHLY_INCOME_MINOR;

pub(crate) fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        month: budget.month,
        monthly_income_minor: budget.monthly_income_minor,
        updated_at: budget.updated_at,
    }
}

/// Two explicit steps: lookup, then insert the default row on absence.
pub(crate) async fn current_budget(
    state: &ServerState,
    owner: &str,
) -> Result<engine::Budget, ServerError> {
    let month = current_month();
    if let Some(budget) = state.engine.budget(owner, &month).await {
        return Ok(budget);
    }

    let budget = state
        .engine
        .set_budget(owner, &month, DEFAULT_MONTHLY_INCOME_MINOR)
        .await?;
    Ok(budget)
}

/// Returns the current-month budget, lazily created with the default income
/// the first time it is read.
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = current_budget(&state, &user.username).await?;
    Ok(Json(map_budget(budget)))
}

/// Upserts the current-month budget row.
pub async fn set(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetSet>,
) -> Result<Json<BudgetView>, ServerError> {
    let month = current_month();
    let budget = state
        .engine
        .set_budget(&user.username, &month, payload.monthly_income_minor)
        .await?;

    Ok(Json(map_budget(budget)))
}
