// src/models/crm.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::scoped_repo::CompanyRecord;

// Nomes só com espaços contam como vazios
pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("O nome é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "Liam Johnson")]
    pub name: String,
    #[schema(example = "liam@example.com")]
    pub email: String,
    #[schema(example = "(11) 98765-4321")]
    pub phone: String,
    // Acumulado das vendas concluídas; não é editável pelo cliente da API
    #[serde(default)]
    #[schema(example = "250.00")]
    pub total_spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord for Customer {
    const COLLECTION: &'static str = "customers";
    const LABEL: &'static str = "Cliente";
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[serde(default)]
    pub phone: String,
}

// O documento gravado na criação: totalSpent começa zerado
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub total_spent: Decimal,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_names_fail_validation() {
        let create: CreateCustomerPayload =
            serde_json::from_value(json!({ "name": "   ", "email": "liam@example.com" })).unwrap();
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let update: UpdateCustomerPayload = serde_json::from_value(json!({ "name": "\t" })).unwrap();
        assert!(update.validate().is_err());

        let ok: UpdateCustomerPayload = serde_json::from_value(json!({ "phone": "123" })).unwrap();
        assert!(ok.validate().is_ok());
    }
}
