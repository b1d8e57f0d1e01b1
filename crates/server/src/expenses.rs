//! Expense API endpoints

use api_types::bulk::{BulkIds, BulkResult, BulkStatus};
use api_types::expense::{ExpenseNew, ExpenseStatus as ApiStatus, ExpenseUpdate, ExpenseView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{ExpenseStatus, MoneyCents, RecordKind, RecordStatus};
use uuid::Uuid;

use crate::{ServerError, incomes::map_bulk, server::ServerState};

fn map_status(status: ExpenseStatus) -> ApiStatus {
    match status {
        ExpenseStatus::Open => ApiStatus::Open,
        ExpenseStatus::Paid => ApiStatus::Paid,
    }
}

fn parse_status(status: ApiStatus) -> ExpenseStatus {
    match status {
        ApiStatus::Open => ExpenseStatus::Open,
        ApiStatus::Paid => ExpenseStatus::Paid,
    }
}

pub(crate) fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description,
        category: expense.category,
        amount_minor: expense.amount.cents(),
        occurred_on: expense.occurred_on,
        is_business_cost: expense.is_business_cost,
        status: map_status(expense.status),
        source_income_id: expense.source_income_id,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
        revision: expense.revision,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.list_expenses().await?;
    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(id).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let mut cmd = engine::NewExpense::new(
        payload.description,
        payload.category,
        MoneyCents::new(payload.amount_minor),
        payload.occurred_on,
    )
    .business_cost(payload.is_business_cost);
    if let Some(status) = payload.status {
        cmd = cmd.status(parse_status(status));
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let patch = engine::ExpensePatch {
        description: payload.description,
        category: payload.category,
        amount: payload.amount_minor.map(MoneyCents::new),
        occurred_on: payload.occurred_on,
        is_business_cost: payload.is_business_cost,
        status: payload.status.map(parse_status),
        expected_revision: payload.expected_revision,
    };

    let expense = state.engine.update_expense(id, patch).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<BulkIds>,
) -> Result<Json<BulkResult>, ServerError> {
    let outcome = state
        .engine
        .bulk_delete(RecordKind::Expense, &payload.ids)
        .await?;
    Ok(Json(map_bulk(outcome)))
}

pub async fn bulk_status(
    State(state): State<ServerState>,
    Json(payload): Json<BulkStatus>,
) -> Result<Json<BulkResult>, ServerError> {
    let status = RecordStatus::try_from(payload.status.as_str())?;
    let outcome = state
        .engine
        .bulk_set_status(RecordKind::Expense, &payload.ids, status)
        .await?;
    Ok(Json(map_bulk(outcome)))
}
