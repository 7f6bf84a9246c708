// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
    },
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<Uuid, AppError> {
    let token = bearer_token(headers).ok_or(AppError::InvalidToken)?;
    app_state.auth_service.validate_token(token)
}

// Só exige um token válido (rotas /api/users)
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = authenticate(&app_state, request.headers())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}

/// Token válido + perfil → empresa → permissões do cargo.
///
/// A empresa sai sempre do perfil do usuário; nada na requisição a escolhe.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let user_id = authenticate(&app_state, request.headers()).map_err(to_api)?;
    let profile = app_state.tenant_service.profile(user_id).await.map_err(to_api)?;
    let permissions = app_state
        .rbac_service
        .permissions_for(profile.company_id, &profile.role)
        .await
        .map_err(to_api)?;

    tracing::debug!(
        "🔑 Usuário {} na empresa {} como '{}'",
        user_id,
        profile.company_id,
        profile.role
    );

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    request.extensions_mut().insert(TenantContext {
        company_id: profile.company_id,
        user_id,
        role: profile.role,
        permissions,
    });

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(*user);
        }

        // Rota montada sem o guard: trata como não autenticado
        let Ok(locale) = Locale::from_request_parts(parts, state).await;
        Err(AppError::InvalidToken.to_api_error(&locale, &I18nStore::default()))
    }
}
