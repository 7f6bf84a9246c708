// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::rbac::PageSlug,
};

/// 1. O Trait que define a página exigida por uma rota
pub trait PageDef: Send + Sync + 'static {
    fn page() -> PageSlug;
}

/// 2. O Extractor (Guardião): 403 se o cargo não vê a página
pub struct RequirePage<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePage<T>
where
    T: PageDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        let tenant = TenantContext::from_request_parts(parts, state).await?;
        let page = T::page();

        if !tenant.permissions.allows(page) {
            tracing::warn!(
                "⛔ Usuário {} ('{}') sem acesso à página '{}'",
                tenant.user_id,
                tenant.role,
                page
            );
            return Err(AppError::Forbidden(page.label().to_string())
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePage(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PÁGINAS (TIPOS)
// ---

pub struct PageDashboard;
impl PageDef for PageDashboard {
    fn page() -> PageSlug { PageSlug::Dashboard }
}

pub struct PageSales;
impl PageDef for PageSales {
    fn page() -> PageSlug { PageSlug::Sales }
}

pub struct PageOrders;
impl PageDef for PageOrders {
    fn page() -> PageSlug { PageSlug::Orders }
}

pub struct PageInventory;
impl PageDef for PageInventory {
    fn page() -> PageSlug { PageSlug::Inventory }
}

pub struct PageCategories;
impl PageDef for PageCategories {
    fn page() -> PageSlug { PageSlug::Categories }
}

pub struct PageCustomers;
impl PageDef for PageCustomers {
    fn page() -> PageSlug { PageSlug::Customers }
}

pub struct PageFinance;
impl PageDef for PageFinance {
    fn page() -> PageSlug { PageSlug::Finance }
}

pub struct PageDocuments;
impl PageDef for PageDocuments {
    fn page() -> PageSlug { PageSlug::Documents }
}

pub struct PageRoles;
impl PageDef for PageRoles {
    fn page() -> PageSlug { PageSlug::Roles }
}

pub struct PageSettings;
impl PageDef for PageSettings {
    fn page() -> PageSlug { PageSlug::Settings }
}
