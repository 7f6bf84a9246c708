// src/handlers/sales.rs

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
        rbac::{PageOrders, PageSales, RequirePage},
        tenancy::TenantContext,
    },
    models::{
        document::{DocumentResponse, StoredDocumentOptions},
        sales::{
            CreateOrderPayload, CreateSalePayload, Order, Sale, UpdateOrderPayload,
            UpdateSalePayload,
        },
    },
};

// ---
// PEDIDOS
// ---

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Sales",
    responses(
        (status = 200, description = "Pedidos da empresa", body = Vec<Order>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageOrders>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .sales_service
        .list_orders(tenant.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(orders))
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Sales",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com total calculado", body = Order),
        (status = 400, description = "Dados inválidos, cliente ou produto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageOrders>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .sales_service
        .create_order(tenant.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID do Pedido")),
    responses(
        (status = 200, description = "Pedido", body = Order),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageOrders>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .sales_service
        .get_order(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(order))
}

// PATCH /api/orders/{id}
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID do Pedido")),
    request_body = UpdateOrderPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = Order),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageOrders>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .sales_service
        .update_order(tenant.company_id, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(order))
}

// DELETE /api/orders/{id}
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID do Pedido")),
    responses(
        (status = 204, description = "Pedido removido"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageOrders>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .sales_service
        .delete_order(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/orders/{id}/document
#[utoipa::path(
    post,
    path = "/api/orders/{id}/document",
    tag = "Sales",
    params(
        ("id" = Uuid, Path, description = "ID do Pedido"),
        StoredDocumentOptions
    ),
    responses(
        (status = 200, description = "Texto do documento do pedido", body = DocumentResponse),
        (status = 404, description = "Pedido não encontrado"),
        (status = 502, description = "Falha ao gerar o documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_order_document(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageOrders>,
    Path(id): Path<Uuid>,
    Query(options): Query<StoredDocumentOptions>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        let order = app_state.sales_service.get_order(tenant.company_id, id).await?;
        let company = app_state.tenant_service.company(tenant.company_id).await?;
        app_state
            .document_service
            .generate_for_record(
                &company.name,
                &order.customer_name,
                &order.items,
                order.total,
                order.created_at,
                options.style,
            )
            .await
    }
    .await;

    let document = result.map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(document))
}

// ---
// VENDAS
// ---

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Vendas da empresa", body = Vec<Sale>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSales>,
) -> Result<impl IntoResponse, ApiError> {
    let sales = app_state
        .sales_service
        .list_sales(tenant.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(sales))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda criada; se concluída, lança a receita", body = Sale),
        (status = 400, description = "Dados inválidos, cliente ou produto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSales>,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let sale = app_state
        .sales_service
        .create_sale(tenant.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da Venda")),
    responses(
        (status = 200, description = "Venda", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSales>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .sales_service
        .get_sale(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(sale))
}

// PATCH /api/sales/{id}
#[utoipa::path(
    patch,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da Venda")),
    request_body = UpdateSalePayload,
    responses(
        (status = 200, description = "Venda atualizada", body = Sale),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSales>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let sale = app_state
        .sales_service
        .update_sale(tenant.company_id, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(sale))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da Venda")),
    responses(
        (status = 204, description = "Venda removida"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSales>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .sales_service
        .delete_sale(tenant.company_id, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/sales/{id}/document
#[utoipa::path(
    post,
    path = "/api/sales/{id}/document",
    tag = "Sales",
    params(
        ("id" = Uuid, Path, description = "ID da Venda"),
        StoredDocumentOptions
    ),
    responses(
        (status = 200, description = "Texto do documento da venda", body = DocumentResponse),
        (status = 404, description = "Venda não encontrada"),
        (status = 502, description = "Falha ao gerar o documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_sale_document(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePage<PageSales>,
    Path(id): Path<Uuid>,
    Query(options): Query<StoredDocumentOptions>,
) -> Result<impl IntoResponse, ApiError> {
    let result = async {
        let sale = app_state.sales_service.get_sale(tenant.company_id, id).await?;
        let company = app_state.tenant_service.company(tenant.company_id).await?;
        app_state
            .document_service
            .generate_for_record(
                &company.name,
                &sale.customer_name,
                &sale.items,
                sale.total,
                sale.created_at,
                options.style,
            )
            .await
    }
    .await;

    let document = result.map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(document))
}
