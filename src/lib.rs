// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::{auth_guard, tenant_guard};

/// Monta o router completo da API sobre um `AppState` já construído.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Só exige token; o perfil é lido pelo próprio handler
    let user_routes = Router::new()
        .route("/me", get(handlers::tenancy::get_me))
        .route("/me/navigation", get(handlers::tenancy::get_navigation))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Tudo daqui para baixo é da empresa do usuário (tenant_guard resolve a empresa)
    let company_routes = Router::new()
        // Estoque
        .route(
            "/products",
            get(handlers::inventory::list_products).post(handlers::inventory::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::inventory::get_product)
                .patch(handlers::inventory::update_product)
                .delete(handlers::inventory::delete_product),
        )
        .route(
            "/categories",
            get(handlers::inventory::list_categories).post(handlers::inventory::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::inventory::get_category)
                .patch(handlers::inventory::update_category)
                .delete(handlers::inventory::delete_category),
        )
        // Clientes
        .route(
            "/customers",
            get(handlers::crm::list_customers).post(handlers::crm::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::crm::get_customer)
                .patch(handlers::crm::update_customer)
                .delete(handlers::crm::delete_customer),
        )
        // Pedidos e vendas
        .route(
            "/orders",
            get(handlers::sales::list_orders).post(handlers::sales::create_order),
        )
        .route(
            "/orders/{id}",
            get(handlers::sales::get_order)
                .patch(handlers::sales::update_order)
                .delete(handlers::sales::delete_order),
        )
        .route("/orders/{id}/document", post(handlers::sales::generate_order_document))
        .route(
            "/sales",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route(
            "/sales/{id}",
            get(handlers::sales::get_sale)
                .patch(handlers::sales::update_sale)
                .delete(handlers::sales::delete_sale),
        )
        .route("/sales/{id}/document", post(handlers::sales::generate_sale_document))
        // Financeiro
        .route(
            "/finance/transactions",
            get(handlers::finance::list_transactions).post(handlers::finance::create_transaction),
        )
        .route(
            "/finance/transactions/{id}",
            get(handlers::finance::get_transaction)
                .patch(handlers::finance::update_transaction)
                .delete(handlers::finance::delete_transaction),
        )
        .route("/finance/summary", get(handlers::finance::get_summary))
        // Painel
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        // Cargos
        .route(
            "/roles",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route(
            "/roles/{id}",
            patch(handlers::rbac::update_role).delete(handlers::rbac::delete_role),
        )
        .route("/permissions", get(handlers::rbac::get_all_permissions))
        // Configurações
        .route(
            "/settings/company",
            get(handlers::settings::get_company).patch(handlers::settings::update_company),
        )
        .route(
            "/settings/members",
            get(handlers::settings::list_members).post(handlers::settings::add_member),
        )
        // Documentos
        .route("/documents/generate", post(handlers::documents::generate_document))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/plans", get(handlers::auth::list_plans))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api", company_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
