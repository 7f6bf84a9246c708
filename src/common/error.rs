// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erro interno de todas as camadas (db, services, middleware).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Perfil sem empresa vinculada")]
    ProfileNotFound,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Sem permissão para a página '{0}'")]
    Forbidden(String),

    #[error("O cargo Admin é protegido")]
    ProtectedRole,

    #[error("Cargo '{0}' já existe")]
    RoleAlreadyExists(String),

    #[error("Cargo '{0}' ainda tem membros")]
    RoleInUse(String),

    #[error("Cargo '{0}' não existe")]
    UnknownRole(String),

    #[error("Permissão '{0}' não existe")]
    UnknownPermission(String),

    #[error("Produto {0} não existe")]
    UnknownProduct(uuid::Uuid),

    #[error("Cliente {0} não existe")]
    UnknownCustomer(uuid::Uuid),

    #[error("Limite de {0} usuários do plano atingido")]
    PlanUserLimit(usize),

    #[error("Falha ao configurar usuário e empresa: {0}")]
    AccountSetupFailed(String),

    #[error("Falha na geração do documento: {0}")]
    DocumentGenerationFailed(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Documento corrompido: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Atalho para erros de validação montados à mão (regras que o derive não cobre).
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = validator::ValidationError::new(code);
        error.message = Some(message.into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::UnknownRole(_)
            | AppError::UnknownPermission(_)
            | AppError::UnknownProduct(_)
            | AppError::UnknownCustomer(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ProfileNotFound
            | AppError::Forbidden(_)
            | AppError::ProtectedRole
            | AppError::PlanUserLimit(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists | AppError::RoleAlreadyExists(_) | AppError::RoleInUse(_) => {
                StatusCode::CONFLICT
            }
            AppError::DocumentGenerationFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Chave do catálogo de mensagens + parâmetro opcional ({0} na mensagem).
    fn message_key(&self) -> (&'static str, Option<String>) {
        match self {
            AppError::ValidationError(_) => ("validation", None),
            AppError::EmailAlreadyExists => ("email_already_exists", None),
            AppError::InvalidCredentials => ("invalid_credentials", None),
            AppError::InvalidToken => ("invalid_token", None),
            AppError::ProfileNotFound => ("profile_not_found", None),
            AppError::NotFound(entity) => ("not_found", Some(entity.to_string())),
            AppError::Forbidden(page) => ("forbidden_page", Some(page.clone())),
            AppError::ProtectedRole => ("protected_role", None),
            AppError::RoleAlreadyExists(name) => ("role_already_exists", Some(name.clone())),
            AppError::RoleInUse(name) => ("role_in_use", Some(name.clone())),
            AppError::UnknownRole(name) => ("unknown_role", Some(name.clone())),
            AppError::UnknownPermission(slug) => ("unknown_permission", Some(slug.clone())),
            AppError::UnknownProduct(id) => ("unknown_product", Some(id.to_string())),
            AppError::UnknownCustomer(id) => ("unknown_customer", Some(id.to_string())),
            AppError::PlanUserLimit(max) => ("plan_user_limit", Some(max.to_string())),
            AppError::AccountSetupFailed(_) => ("account_setup_failed", None),
            AppError::DocumentGenerationFailed(_) => ("document_generation_failed", None),
            _ => ("internal", None),
        }
    }

    /// Converte o erro interno na resposta HTTP traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (key, param) = self.message_key();
        let error = i18n.translate(&locale.0, key, param.as_deref());

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

// O erro que sai para o cliente (já traduzido).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let err = AppError::field("name", "required", "O nome é obrigatório.");
        let api = err.to_api_error(&pt(), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "O nome é obrigatório.");
    }

    #[test]
    fn generator_failures_use_the_fixed_message() {
        let err = AppError::DocumentGenerationFailed("timeout".into());
        let api = err.to_api_error(&pt(), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.error, "Ocorreu um erro ao gerar o documento. Tente novamente.");
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let err = AppError::AccountSetupFailed("connection reset".into());
        let api = err.to_api_error(&pt(), &I18nStore::new());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("connection reset"));
    }

    #[test]
    fn messages_follow_the_locale() {
        let err = AppError::NotFound("Produto");
        let api = err.to_api_error(&Locale("en".to_string()), &I18nStore::new());

        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Produto not found.");
    }
}
