// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::scoped_repo::CompanyRecord;

// ---
// Itens (snapshot do produto no momento do pedido)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Option<Uuid>,
    #[schema(example = "Mouse Gamer")]
    pub name: String,
    #[schema(example = 2)]
    pub quantity: u32,
    #[schema(example = "250.00")]
    pub price: Decimal,
}

impl LineItem {
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Total = soma de (preço × quantidade) de todos os itens.
/// `None` quando a conta sai da faixa do `Decimal`.
pub fn compute_total(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal()?))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    #[schema(example = 1)]
    pub quantity: u32,
}

// ---
// Pedidos
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Processing, // "Processando"
    Shipped,    // "Enviado"
    Delivered,  // "Entregue"
    Cancelled,  // "Cancelado"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "Liam Johnson")]
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    #[schema(example = "250.00")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord for Order {
    const COLLECTION: &'static str = "orders";
    const LABEL: &'static str = "Pedido";
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub customer_id: Uuid,

    #[serde(default)]
    pub status: OrderStatus,

    #[validate(length(min = 1, message = "Adicione pelo menos um produto."), nested)]
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub customer_id: Option<Uuid>,

    pub status: Option<OrderStatus>,

    #[validate(length(min = 1, message = "Adicione pelo menos um produto."), nested)]
    pub items: Option<Vec<LineItemInput>>,
}

// ---
// Vendas
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Completed, // "Concluída"
    #[default]
    Pending,   // "Pendente"
    Cancelled, // "Cancelada"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "Olivia Smith")]
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub status: SaleStatus,
    #[schema(example = "150.00")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord for Sale {
    const COLLECTION: &'static str = "sales";
    const LABEL: &'static str = "Venda";
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub customer_id: Uuid,

    #[serde(default)]
    pub status: SaleStatus,

    #[validate(length(min = 1, message = "Adicione pelo menos um produto."), nested)]
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalePayload {
    pub customer_id: Option<Uuid>,

    pub status: Option<SaleStatus>,

    #[validate(length(min = 1, message = "Adicione pelo menos um produto."), nested)]
    pub items: Option<Vec<LineItemInput>>,
}

// O documento de pedido/venda como é gravado (status genérico)
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDocPatch<'a, S: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<&'a [LineItem]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<S>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, scale: u32, quantity: u32) -> LineItem {
        LineItem {
            product_id: None,
            name: "x".into(),
            quantity,
            price: Decimal::new(price, scale),
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let items = vec![item(25000, 2, 1), item(4550, 2, 3), item(199, 2, 10)];
        // 250.00 + 136.50 + 19.90
        assert_eq!(compute_total(&items), Some(Decimal::new(40640, 2)));
    }

    #[test]
    fn empty_order_totals_zero() {
        assert_eq!(compute_total(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn total_out_of_decimal_range_is_none() {
        let huge = LineItem { price: Decimal::MAX, ..item(1, 0, 2) };
        assert_eq!(huge.subtotal(), None);
        assert_eq!(compute_total(&[huge]), None);

        let single = LineItem { price: Decimal::MAX, ..item(1, 0, 1) };
        assert_eq!(compute_total(&[single.clone(), single]), None);
    }

    #[test]
    fn zero_quantity_items_fail_validation() {
        let payload: CreateOrderPayload = serde_json::from_value(serde_json::json!({
            "customerId": Uuid::new_v4(),
            "items": [{ "productId": Uuid::new_v4(), "quantity": 0 }]
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn orders_without_items_fail_validation() {
        let payload: CreateSalePayload = serde_json::from_value(serde_json::json!({
            "customerId": Uuid::new_v4(),
            "items": []
        }))
        .unwrap();
        assert!(payload.validate().is_err());
        assert_eq!(payload.status, SaleStatus::Pending);
    }
}
