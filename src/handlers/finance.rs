// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PageFinance, RequirePage},
        tenancy::TenantContext,
    },
    models::finance::{
        CreateTransactionPayload, MonthlySummary, Transaction, TransactionFilter,
        UpdateTransactionPayload,
    },
};

// GET /api/finance/transactions?from=&to=&customer=&product=
#[utoipa::path(
    get,
    path = "/api/finance/transactions",
    tag = "Finance",
    params(TransactionFilter),
    responses(
        (status = 200, description = "Transações filtradas", body = Vec<Transaction>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageFinance>,
    Query(filter): Query<TransactionFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .finance_service
        .list_transactions(tenant.company_id, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transactions))
}

// POST /api/finance/transactions
#[utoipa::path(
    post,
    path = "/api/finance/transactions",
    tag = "Finance",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Transação lançada", body = Transaction),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageFinance>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_service
        .create_transaction(tenant.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// GET /api/finance/transactions/{id}
#[utoipa::path(
    get,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da Transação")),
    responses(
        (status = 200, description = "Transação", body = Transaction),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageFinance>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .finance_service
        .get_transaction(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transaction))
}

// PATCH /api/finance/transactions/{id}
#[utoipa::path(
    patch,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da Transação")),
    request_body = UpdateTransactionPayload,
    responses(
        (status = 200, description = "Transação atualizada", body = Transaction),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageFinance>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_service
        .update_transaction(tenant.company_id, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transaction))
}

// DELETE /api/finance/transactions/{id}
#[utoipa::path(
    delete,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da Transação")),
    responses(
        (status = 204, description = "Transação removida"),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageFinance>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete_transaction(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/finance/summary
#[utoipa::path(
    get,
    path = "/api/finance/summary",
    tag = "Finance",
    responses(
        (status = 200, description = "Receitas e despesas dos últimos 6 meses", body = Vec<MonthlySummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageFinance>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .finance_service
        .summary(tenant.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
