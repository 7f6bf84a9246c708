// src/handlers/tenancy.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{rbac::NavEntry, tenancy::MeResponse},
};

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil e empresa do usuário", body = MeResponse),
        (status = 401, description = "Token inválido"),
        (status = 403, description = "Usuário sem empresa vinculada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let me = app_state
        .tenant_service
        .me(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(me))
}

// GET /api/users/me/navigation (menu lateral filtrado pelo cargo)
#[utoipa::path(
    get,
    path = "/api/users/me/navigation",
    tag = "Users",
    responses(
        (status = 200, description = "Itens de navegação visíveis", body = Vec<NavEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_navigation(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let profile = app_state.tenant_service.profile(user_id).await.map_err(to_api)?;
    let permissions = app_state
        .rbac_service
        .permissions_for(profile.company_id, &profile.role)
        .await
        .map_err(to_api)?;

    Ok(Json(app_state.rbac_service.navigation(&permissions)))
}
