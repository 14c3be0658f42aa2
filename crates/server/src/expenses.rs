//! Expense API endpoints

use api_types::expense::{ExpenseDeleted, ExpenseNew, ExpenseUpdate, ExpenseView, InstallmentNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        category: expense.category,
        amount_minor: expense.amount_minor,
        date: expense.date,
        description: expense.description,
        installments: expense.installments,
        installment_number: expense.installment_number,
        original_purchase_date: expense.original_purchase_date,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Json<Vec<ExpenseView>> {
    let expenses = state.engine.list_expenses(&user.username).await;
    Json(expenses.into_iter().map(map_expense).collect())
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let new = engine::NewExpense::new(
        &payload.category,
        payload.amount_minor,
        payload.date,
        payload.description,
    )?;
    let expense = state.engine.create_expense(&user.username, &new).await?;

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

/// Applies a partial update; the body is `null` when no owned row changed.
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Option<ExpenseView>>, ServerError> {
    let changes = engine::ExpenseChanges {
        category: payload.category,
        amount_minor: payload.amount_minor,
        date: payload.date,
        description: payload.description,
    };
    let updated = state
        .engine
        .update_expense(id, &user.username, &changes)
        .await?;

    Ok(Json(updated.map(map_expense)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    let success = state.engine.delete_expense(id, &user.username).await?;

    Ok(Json(ExpenseDeleted { success }))
}

/// Creates an installment batch.
///
/// The response may hold fewer rows than requested when the store failed
/// mid-batch; the rows returned are persisted either way.
pub async fn create_installments(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<InstallmentNew>,
) -> Result<(StatusCode, Json<Vec<ExpenseView>>), ServerError> {
    let plan = engine::InstallmentPlan::new(
        &payload.category,
        payload.amount_minor,
        payload.installments,
        payload.purchase_date,
        payload.description,
    )?;
    let created = state.engine.create_installments(&user.username, &plan).await?;

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(map_expense).collect()),
    ))
}
