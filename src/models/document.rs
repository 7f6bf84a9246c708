// src/models/document.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::finance::validate_positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStyle {
    /// Documento formal no estilo "Nota Fiscal", sem valor fiscal.
    #[default]
    Informative,
    /// Recibo curto.
    Receipt,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    #[schema(example = "Laptop Pro")]
    pub name: String,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    #[schema(example = 1)]
    pub quantity: u32,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "7500.00")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Sua Empresa LTDA")]
    pub company_name: String,

    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Liam Johnson")]
    pub customer_name: String,

    #[validate(length(min = 1, message = "Adicione pelo menos um produto."), nested)]
    pub products: Vec<DocumentLine>,

    // Ausente: soma dos itens
    #[serde(default)]
    pub total_amount: Option<Decimal>,

    // Ausente: hoje (dd/mm/aaaa)
    #[serde(default)]
    #[schema(example = "14/03/2025")]
    pub date: Option<String>,

    #[serde(default)]
    pub style: DocumentStyle,
}

impl DocumentRequest {
    /// Soma de preço × quantidade; `None` se sair da faixa do `Decimal`.
    pub fn items_total(&self) -> Option<Decimal> {
        self.products.iter().try_fold(Decimal::ZERO, |acc, p| {
            acc.checked_add(p.price.checked_mul(Decimal::from(p.quantity))?)
        })
    }
}

// Query dos endpoints que geram a partir de um pedido/venda gravado (?style=RECEIPT)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StoredDocumentOptions {
    #[serde(default)]
    pub style: DocumentStyle,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub document_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn style_defaults_to_informative() {
        let req: DocumentRequest = serde_json::from_value(json!({
            "companyName": "ACME",
            "customerName": "Liam",
            "products": [{ "name": "Mouse", "quantity": 2, "price": "10.50" }]
        }))
        .unwrap();
        assert_eq!(req.style, DocumentStyle::Informative);
        assert_eq!(req.items_total(), Some(Decimal::new(2100, 2)));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn free_products_are_rejected() {
        let req: DocumentRequest = serde_json::from_value(json!({
            "companyName": "ACME",
            "customerName": "Liam",
            "products": [{ "name": "Brinde", "quantity": 1, "price": "0" }],
            "style": "RECEIPT"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
