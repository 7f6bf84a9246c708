// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
    },
    middleware::i18n::Locale,
    models::rbac::PermissionSet,
};

// A empresa em que o usuário está operando, resolvida pelo tenant_guard
// a partir do perfil (nunca de um cabeçalho ou do corpo).
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub permissions: PermissionSet,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(ctx.clone());
        }

        let Ok(locale) = Locale::from_request_parts(parts, state).await;
        Err(AppError::ProfileNotFound.to_api_error(&locale, &I18nStore::default()))
    }
}
