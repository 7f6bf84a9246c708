// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::scoped_repo::CompanyRecord;

/// Abaixo deste número de unidades o produto é "Estoque Baixo".
pub const LOW_STOCK_THRESHOLD: i64 = 10;

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// --- 1. Situação do estoque (derivada da quantidade) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    LowStock,
    #[default]
    OutOfStock,
}

impl StockStatus {
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// --- 2. Produtos ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "Laptop Pro")]
    pub name: String,
    #[schema(example = "LP-001")]
    #[serde(default)]
    pub sku: Option<String>,
    #[schema(example = "Eletrônicos")]
    pub category: String,
    #[schema(example = 15)]
    pub quantity: i64,
    #[schema(example = "7500.00")]
    pub price: Decimal,
    // Nunca gravado: recalculado a cada leitura
    #[serde(default)]
    pub status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn with_status(mut self) -> Self {
        self.status = StockStatus::from_quantity(self.quantity);
        self
    }
}

impl CompanyRecord for Product {
    const COLLECTION: &'static str = "products";
    const LABEL: &'static str = "Produto";
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Mouse Gamer")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    #[schema(example = "Periféricos")]
    pub category: String,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[serde(default)]
    pub quantity: i64,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "250.00")]
    pub price: Decimal,
}

// Escrita parcial: campos ausentes não são tocados
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,
}

// --- 3. Categorias ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "Eletrônicos")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord for Category {
    const COLLECTION: &'static str = "categories";
    const LABEL: &'static str = "Categoria";
}

// Usado tanto na criação quanto na edição (o formulário só tem o nome)
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Periféricos")]
    pub name: String,
}
