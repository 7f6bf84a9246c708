// tests/api_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use easybusiness::{
    build_router,
    config::{AppState, Config},
    db::MemoryStore,
    services::document_service::{GenerationError, TextGenerator},
};

// Gerador que devolve um texto fixo ou falha sempre
struct StubGenerator {
    fail: bool,
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.fail {
            return Err(GenerationError::Status(503));
        }
        Ok(format!("DOCUMENTO ({} caracteres de prompt)", prompt.len()))
    }
}

fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: "segredo-de-teste".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        bcrypt_cost: 4,
        token_ttl_days: 1,
        genai_api_key: None,
        genai_model: "gemini-test".to_string(),
        genai_base_url: "http://localhost".to_string(),
    }
}

fn app_with(fail_generation: bool) -> Router {
    let state = AppState::with_store(
        &test_config(),
        Arc::new(MemoryStore::new()),
        Arc::new(StubGenerator { fail: fail_generation }),
    );
    build_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, email: &str, company: &str, plan: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "segredo123",
            "name": "Dono",
            "phone": "(11) 90000-0000",
            "companyName": company,
            "plan": plan,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn token_of(body: &Value) -> String {
    body["token"].as_str().unwrap().to_string()
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

async fn create_product(app: &Router, token: &str, name: &str, quantity: i64, price: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/products",
        Some(token),
        Some(json!({ "name": name, "category": "Geral", "quantity": quantity, "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_customer(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/customers",
        Some(token),
        Some(json!({ "name": name, "email": "cliente@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn health_and_plans_are_public() {
    let app = app_with(false);

    let (status, _) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, plans) = send(&app, "GET", "/api/plans", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn register_then_login_returns_a_working_token() {
    let app = app_with(false);
    let created = register(&app, "Dono@Loja.com", "Loja Um", "STANDARD").await;
    assert!(created["companyId"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "dono@loja.com", "password": "segredo123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = token_of(&body);

    let (status, me) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["profile"]["role"], "Admin");
    assert_eq!(me["company"]["name"], "Loja Um");
    assert_eq!(me["company"]["id"], created["companyId"]);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = app_with(false);
    register(&app, "dono@loja.com", "Loja Um", "STANDARD").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "dono@loja.com",
            "password": "segredo123",
            "name": "Outro",
            "phone": "1",
            "companyName": "Loja Dois",
            "plan": "PLUS",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_and_missing_token_are_unauthorized() {
    let app = app_with(false);
    register(&app, "dono@loja.com", "Loja Um", "STANDARD").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "dono@loja.com", "password": "errada123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_navigation_shows_every_page() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let (status, nav) = send(&app, "GET", "/api/users/me/navigation", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = nav.as_array().unwrap().iter().map(|i| i["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs.first(), Some(&"dashboard"));
    assert!(slugs.contains(&"finance"));
    assert!(slugs.contains(&"settings"));
}

#[tokio::test]
async fn companies_never_see_each_others_records() {
    let app = app_with(false);
    let token_a = token_of(&register(&app, "a@loja.com", "Loja A", "STANDARD").await);
    let token_b = token_of(&register(&app, "b@loja.com", "Loja B", "STANDARD").await);

    let product = create_product(&app, &token_a, "Mouse", 12, "50.00").await;
    let id = product["id"].as_str().unwrap();

    let (status, list) = send(&app, "GET", "/api/products", Some(&token_b), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    let uri = format!("/api/products/{}", id);
    let (status, _) = send(&app, "GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PATCH", &uri, Some(&token_b), Some(json!({ "name": "Roubado" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, still_there) = send(&app, "GET", &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["name"], "Mouse");
}

#[tokio::test]
async fn product_status_follows_quantity() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let empty = create_product(&app, &token, "Cabo", 0, "5.00").await;
    let low = create_product(&app, &token, "Teclado", 9, "80.00").await;
    let plenty = create_product(&app, &token, "Monitor", 10, "900.00").await;

    assert_eq!(empty["status"], "OUT_OF_STOCK");
    assert_eq!(low["status"], "LOW_STOCK");
    assert_eq!(plenty["status"], "IN_STOCK");
}

#[tokio::test]
async fn unchanged_edit_only_moves_updated_at() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);
    let customer = create_customer(&app, &token, "Liam Johnson").await;
    let uri = format!("/api/customers/{}", customer["id"].as_str().unwrap());

    let (status, edited) = send(
        &app,
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "name": "Liam Johnson", "email": "cliente@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut before = customer.as_object().unwrap().clone();
    let mut after = edited.as_object().unwrap().clone();
    before.remove("updatedAt");
    after.remove("updatedAt");
    assert_eq!(before, after);
}

#[tokio::test]
async fn order_total_is_computed_from_current_prices() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);
    let customer = create_customer(&app, &token, "Olivia Smith").await;
    let mouse = create_product(&app, &token, "Mouse", 20, "49.90").await;
    let cable = create_product(&app, &token, "Cabo", 20, "10.00").await;

    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&token),
        Some(json!({
            "customerId": customer["id"],
            "items": [
                { "productId": mouse["id"], "quantity": 2 },
                { "productId": cable["id"], "quantity": 3 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(decimal(&order["total"]), Decimal::new(12980, 2));
    assert_eq!(order["customerName"], "Olivia Smith");
    assert_eq!(order["status"], "PROCESSING");
}

#[tokio::test]
async fn order_without_items_is_rejected() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);
    let customer = create_customer(&app, &token, "Olivia Smith").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&token),
        Some(json!({ "customerId": customer["id"], "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["items"].is_array());
}

#[tokio::test]
async fn completed_sale_feeds_finance_and_dashboard() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);
    let customer = create_customer(&app, &token, "Liam Johnson").await;
    let laptop = create_product(&app, &token, "Laptop", 3, "2500.00").await;

    let (status, sale) = send(
        &app,
        "POST",
        "/api/sales",
        Some(&token),
        Some(json!({
            "customerId": customer["id"],
            "status": "COMPLETED",
            "items": [{ "productId": laptop["id"], "quantity": 1 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{sale}");

    let (_, transactions) = send(&app, "GET", "/api/finance/transactions", Some(&token), None).await;
    let transactions = transactions.as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["kind"], "REVENUE");
    assert_eq!(transactions[0]["product"], "Laptop");
    assert_eq!(decimal(&transactions[0]["amount"]), Decimal::new(2500, 0));

    let (_, dashboard) = send(&app, "GET", "/api/dashboard/summary", Some(&token), None).await;
    assert_eq!(dashboard["salesCount"], 1);
    assert_eq!(dashboard["customersCount"], 1);
    assert_eq!(dashboard["lowStockCount"], 1);
    assert_eq!(decimal(&dashboard["totalRevenue"]), Decimal::new(2500, 0));
    assert_eq!(dashboard["monthlySales"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn seller_role_cannot_open_finance_or_settings() {
    let app = app_with(false);
    let admin = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let (status, member) = send(
        &app,
        "POST",
        "/api/settings/members",
        Some(&admin),
        Some(json!({
            "name": "Vendedora",
            "email": "vendas@loja.com",
            "password": "segredo123",
            "role": "Vendedor",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{member}");
    assert_eq!(member["role"], "Vendedor");

    let (_, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "vendas@loja.com", "password": "segredo123" })),
    )
    .await;
    let seller = token_of(&login);

    let (status, _) = send(&app, "GET", "/api/customers", Some(&seller), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/finance/transactions", Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("Financeiro"));

    let (status, _) = send(&app, "GET", "/api/settings/members", Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, nav) = send(&app, "GET", "/api/users/me/navigation", Some(&seller), None).await;
    let slugs: Vec<&str> = nav.as_array().unwrap().iter().map(|i| i["slug"].as_str().unwrap()).collect();
    assert!(!slugs.contains(&"finance"));
    assert!(slugs.contains(&"customers"));
}

#[tokio::test]
async fn admin_role_is_protected() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let (status, roles) = send(&app, "GET", "/api/roles", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let admin = roles
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Admin")
        .unwrap()
        .clone();
    let uri = format!("/api/roles/{}", admin["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PATCH", &uri, Some(&token), Some(json!({ "permissions": ["sales"] }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn renamed_role_keeps_its_members_restricted() {
    let app = app_with(false);
    let admin = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let (status, _) = send(
        &app,
        "POST",
        "/api/settings/members",
        Some(&admin),
        Some(json!({
            "name": "Vendedora",
            "email": "vendas@loja.com",
            "password": "segredo123",
            "role": "Vendedor",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, roles) = send(&app, "GET", "/api/roles", Some(&admin), None).await;
    let seller_role = roles
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Vendedor")
        .unwrap()
        .clone();
    let uri = format!("/api/roles/{}", seller_role["id"].as_str().unwrap());

    let (status, _) = send(&app, "PATCH", &uri, Some(&admin), Some(json!({ "permissions": ["sales"] }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, renamed) = send(&app, "PATCH", &uri, Some(&admin), Some(json!({ "name": "Vendas" }))).await;
    assert_eq!(status, StatusCode::OK, "{renamed}");

    let (_, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "vendas@loja.com", "password": "segredo123" })),
    )
    .await;
    let seller = token_of(&login);

    let (_, me) = send(&app, "GET", "/api/users/me", Some(&seller), None).await;
    assert_eq!(me["profile"]["role"], "Vendas");

    let (_, nav) = send(&app, "GET", "/api/users/me/navigation", Some(&seller), None).await;
    let slugs: Vec<&str> = nav.as_array().unwrap().iter().map(|i| i["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs, ["sales"]);

    let (status, _) = send(&app, "GET", "/api/customers", Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Vendas"));
}

#[tokio::test]
async fn blank_customer_name_is_rejected() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(&token),
        Some(json!({ "name": "   ", "email": "liam@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn generator_failure_returns_the_fixed_message() {
    let app = app_with(true);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/documents/generate",
        Some(&token),
        Some(json!({
            "companyName": "Loja Um",
            "customerName": "Liam",
            "products": [{ "name": "Mouse", "quantity": 1, "price": "10.00" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Ocorreu um erro ao gerar o documento. Tente novamente.");
}

#[tokio::test]
async fn sale_document_uses_the_stored_record() {
    let app = app_with(false);
    let token = token_of(&register(&app, "dono@loja.com", "Loja Um", "STANDARD").await);
    let customer = create_customer(&app, &token, "Liam Johnson").await;
    let mouse = create_product(&app, &token, "Mouse", 20, "49.90").await;

    let (_, sale) = send(
        &app,
        "POST",
        "/api/sales",
        Some(&token),
        Some(json!({
            "customerId": customer["id"],
            "items": [{ "productId": mouse["id"], "quantity": 1 }],
        })),
    )
    .await;

    let uri = format!("/api/sales/{}/document?style=RECEIPT", sale["id"].as_str().unwrap());
    let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["documentText"].as_str().unwrap().starts_with("DOCUMENTO"));
}
