// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Plano de assinatura
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    // Aceita também o nome exibido na página de preços
    #[serde(alias = "Plano Padrão")]
    Standard,
    #[serde(alias = "Plano Plus")]
    Plus,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Standard, Plan::Plus];

    pub fn display_name(self) -> &'static str {
        match self {
            Plan::Standard => "Plano Padrão",
            Plan::Plus => "Plano Plus",
        }
    }

    /// Limite de usuários da empresa; `None` = ilimitado.
    pub fn max_users(self) -> Option<usize> {
        match self {
            Plan::Standard => Some(5),
            Plan::Plus => None,
        }
    }

    pub fn info(self) -> PlanInfo {
        let (price, description, features): (&str, &str, &[&str]) = match self {
            Plan::Standard => (
                "R$49,90",
                "Ideal para equipes pequenas começando a organizar seus negócios.",
                &[
                    "Até 5 usuários simultâneos",
                    "Controle de vendas e estoque",
                    "Fluxo de caixa simples",
                    "Emissão de nota informativa",
                    "Suporte por e-mail",
                ],
            ),
            Plan::Plus => (
                "R$89,90",
                "Perfeito para empresas em crescimento que precisam de mais recursos.",
                &[
                    "Usuários ilimitados",
                    "Todas as funcionalidades do Padrão",
                    "Dashboard com métricas avançadas",
                    "Relatórios detalhados",
                    "Suporte prioritário 24/7",
                ],
            ),
        };

        PlanInfo {
            plan: self,
            name: self.display_name().to_string(),
            price: price.to_string(),
            price_suffix: "/mês".to_string(),
            description: description.to_string(),
            max_users: self.max_users(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub plan: Plan,
    #[schema(example = "Plano Padrão")]
    pub name: String,
    #[schema(example = "R$49,90")]
    pub price: String,
    pub price_suffix: String,
    pub description: String,
    pub max_users: Option<usize>,
    pub features: Vec<String>,
}

// ---
// 2. Company (O "Tenant")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Sua Empresa LTDA")]
    pub name: String,
    pub plan: Plan,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O que é gravado no documento da empresa
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData<'a> {
    pub name: &'a str,
    pub plan: Plan,
    pub owner_id: Uuid,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub name: Option<String>,
}

// ---
// 3. UserProfile (A "Ponte" Usuário → Empresa)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "(11) 98765-4321")]
    pub phone: String,
    pub company_id: Uuid,
    #[schema(example = "Admin")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub company_id: Uuid,
    pub role: &'a str,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub profile: UserProfile,
    pub company: Company,
}

// ---
// 4. Membros da empresa (página de Configurações)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Jane Smith")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "jane.smith@example.com")]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "O cargo é obrigatório."))]
    #[schema(example = "Vendedor")]
    pub role: String,
}
