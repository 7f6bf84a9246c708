// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Catálogo de mensagens de erro por idioma. "{0}" é substituído pelo parâmetro.
const PT: &[(&str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos."),
    ("email_already_exists", "Este e-mail já está em uso."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("profile_not_found", "Seu usuário não está vinculado a nenhuma empresa."),
    ("not_found", "{0} não encontrado."),
    ("forbidden_page", "Seu cargo não tem acesso à página '{0}'."),
    ("protected_role", "O cargo Admin não pode ser renomeado, restringido ou excluído."),
    ("role_already_exists", "Já existe um cargo chamado '{0}'."),
    ("role_in_use", "O cargo '{0}' ainda está atribuído a membros da equipe."),
    ("unknown_role", "O cargo '{0}' não existe nesta empresa."),
    ("unknown_permission", "A permissão '{0}' não existe."),
    ("unknown_product", "O produto {0} não existe nesta empresa."),
    ("unknown_customer", "O cliente {0} não existe nesta empresa."),
    ("plan_user_limit", "Seu plano permite no máximo {0} usuários."),
    ("account_setup_failed", "Falha ao configurar usuário e empresa."),
    ("document_generation_failed", "Ocorreu um erro ao gerar o documento. Tente novamente."),
    ("internal", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("email_already_exists", "This e-mail is already in use."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("profile_not_found", "Your user is not linked to any company."),
    ("not_found", "{0} not found."),
    ("forbidden_page", "Your role has no access to the '{0}' page."),
    ("protected_role", "The Admin role cannot be renamed, restricted or deleted."),
    ("role_already_exists", "A role named '{0}' already exists."),
    ("role_in_use", "Role '{0}' is still assigned to team members."),
    ("unknown_role", "Role '{0}' does not exist in this company."),
    ("unknown_permission", "Permission '{0}' does not exist."),
    ("unknown_product", "Product {0} does not exist in this company."),
    ("unknown_customer", "Customer {0} does not exist in this company."),
    ("plan_user_limit", "Your plan allows at most {0} users."),
    ("account_setup_failed", "Failed to set up user and company."),
    ("document_generation_failed", "Failed to generate the document. Please try again."),
    ("internal", "An unexpected error occurred."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages }
    }

    /// Traduz uma chave; idiomas desconhecidos caem no português.
    pub fn translate(&self, lang: &str, key: &str, param: Option<&str>) -> String {
        let catalog = self
            .messages
            .get(lang)
            .or_else(|| self.messages.get(DEFAULT_LANG));

        let template = catalog
            .and_then(|c| c.get(key))
            .copied()
            .unwrap_or(key);

        match param {
            Some(value) => template.replace("{0}", value),
            None => template.to_string(),
        }
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
