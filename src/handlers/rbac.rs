// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PageRoles, RequirePage},
        tenancy::TenantContext,
    },
    models::rbac::{CreateRolePayload, PagePermission, Role, UpdateRolePayload},
};

// GET /api/permissions (páginas que um cargo pode liberar)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Páginas disponíveis", body = Vec<PagePermission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_permissions(
    State(app_state): State<AppState>,
    _guard: RequirePage<PageRoles>,
) -> Json<Vec<PagePermission>> {
    Json(app_state.rbac_service.list_page_permissions())
}

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "RBAC",
    responses(
        (status = 200, description = "Cargos da empresa", body = Vec<Role>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageRoles>,
) -> Result<impl IntoResponse, ApiError> {
    let roles = app_state
        .rbac_service
        .list_roles(tenant.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(roles))
}

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "RBAC",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = Role),
        (status = 400, description = "Dados inválidos ou página desconhecida"),
        (status = 409, description = "Já existe um cargo com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageRoles>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let role = app_state
        .rbac_service
        .create_role(tenant.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(role)))
}

// PATCH /api/roles/{id}
#[utoipa::path(
    patch,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "ID do Cargo")),
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Cargo atualizado", body = Role),
        (status = 403, description = "O cargo Admin não pode ser alterado"),
        (status = 404, description = "Cargo não encontrado"),
        (status = 409, description = "Já existe um cargo com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageRoles>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let role = app_state
        .rbac_service
        .update_role(tenant.company_id, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(role))
}

// DELETE /api/roles/{id}
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "ID do Cargo")),
    responses(
        (status = 204, description = "Cargo removido"),
        (status = 403, description = "O cargo Admin não pode ser removido"),
        (status = 404, description = "Cargo não encontrado"),
        (status = 409, description = "Cargo ainda atribuído a membros")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageRoles>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .rbac_service
        .delete_role(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
