//! Income API endpoints

use api_types::bulk::{BulkIds, BulkResult, BulkStatus};
use api_types::expense::ExpenseView;
use api_types::income::{
    IncomeNew, IncomeSource as ApiSource, IncomeStatus as ApiStatus, IncomeUpdate, IncomeView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{IncomeSource, IncomeStatus, MoneyCents, RecordKind, RecordStatus};
use uuid::Uuid;

use crate::{ServerError, expenses::map_expense, server::ServerState};

fn map_source(source: IncomeSource) -> ApiSource {
    match source {
        IncomeSource::IFood => ApiSource::IFood,
        IncomeSource::Uber => ApiSource::Uber,
        IncomeSource::NinetyNine => ApiSource::NinetyNine,
        IncomeSource::Adjustment => ApiSource::Adjustment,
        IncomeSource::Other => ApiSource::Other,
    }
}

fn parse_source(source: ApiSource) -> IncomeSource {
    match source {
        ApiSource::IFood => IncomeSource::IFood,
        ApiSource::Uber => IncomeSource::Uber,
        ApiSource::NinetyNine => IncomeSource::NinetyNine,
        ApiSource::Adjustment => IncomeSource::Adjustment,
        ApiSource::Other => IncomeSource::Other,
    }
}

fn map_status(status: IncomeStatus) -> ApiStatus {
    match status {
        IncomeStatus::Pending => ApiStatus::Pending,
        IncomeStatus::Forwarded => ApiStatus::Forwarded,
    }
}

fn parse_status(status: ApiStatus) -> IncomeStatus {
    match status {
        ApiStatus::Pending => IncomeStatus::Pending,
        ApiStatus::Forwarded => IncomeStatus::Forwarded,
    }
}

fn map_income(income: engine::Income) -> IncomeView {
    IncomeView {
        id: income.id,
        source: map_source(income.source),
        amount_minor: income.amount.cents(),
        occurred_on: income.occurred_on,
        status: map_status(income.status),
        created_at: income.created_at,
        updated_at: income.updated_at,
        revision: income.revision,
    }
}

pub(crate) fn map_bulk(outcome: engine::BulkOutcome) -> BulkResult {
    BulkResult {
        affected: outcome.affected,
        protected: outcome.protected,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let incomes = state.engine.list_incomes().await?;
    Ok(Json(incomes.into_iter().map(map_income).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IncomeView>, ServerError> {
    let income = state.engine.income(id).await?;
    Ok(Json(map_income(income)))
}

pub async fn tithe(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<ExpenseView>>, ServerError> {
    let tithe = state.engine.tithe_for_income(id).await?;
    Ok(Json(tithe.map(map_expense)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let mut cmd = engine::NewIncome::new(
        parse_source(payload.source),
        MoneyCents::new(payload.amount_minor),
        payload.occurred_on,
    );
    if let Some(status) = payload.status {
        cmd = cmd.status(parse_status(status));
    }

    let income = state.engine.create_income(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_income(income))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<IncomeView>, ServerError> {
    let patch = engine::IncomePatch {
        source: payload.source.map(parse_source),
        amount: payload.amount_minor.map(MoneyCents::new),
        occurred_on: payload.occurred_on,
        status: payload.status.map(parse_status),
        expected_revision: payload.expected_revision,
    };

    let income = state.engine.update_income(id, patch).await?;
    Ok(Json(map_income(income)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<BulkIds>,
) -> Result<Json<BulkResult>, ServerError> {
    let outcome = state
        .engine
        .bulk_delete(RecordKind::Income, &payload.ids)
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
        .bulk_set_status(RecordKind::Income, &payload.ids, status)
        .await?;
    Ok(Json(map_bulk(outcome)))
}
