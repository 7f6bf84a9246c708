// src/handlers/settings.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PageSettings, RequirePage},
        tenancy::TenantContext,
    },
    models::tenancy::{AddMemberPayload, Company, UpdateCompanyPayload, UserProfile},
};

// GET /api/settings/company
#[utoipa::path(
    get,
    path = "/api/settings/company",
    tag = "Settings",
    responses(
        (status = 200, description = "Dados da empresa", body = Company)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSettings>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .tenant_service
        .company(tenant.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(company))
}

// PATCH /api/settings/company
#[utoipa::path(
    patch,
    path = "/api/settings/company",
    tag = "Settings",
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = Company),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSettings>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .tenant_service
        .update_company(tenant.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(updated))
}

// GET /api/settings/members
#[utoipa::path(
    get,
    path = "/api/settings/members",
    tag = "Settings",
    responses(
        (status = 200, description = "Usuários da empresa", body = Vec<UserProfile>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSettings>,
) -> Result<impl IntoResponse, ApiError> {
    let members = app_state
        .tenant_service
        .list_members(tenant.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(members))
}

// POST /api/settings/members
#[utoipa::path(
    post,
    path = "/api/settings/members",
    tag = "Settings",
    request_body = AddMemberPayload,
    responses(
        (status = 201, description = "Membro adicionado", body = UserProfile),
        (status = 400, description = "Dados inválidos ou cargo inexistente"),
        (status = 403, description = "Limite de usuários do plano atingido"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSettings>,
    Json(payload): Json<AddMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .tenant_service
        .add_member(tenant.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}
