// src/db/user_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CollectionRef, DocumentStore, ACCOUNTS, USERS},
    models::{auth::Account, tenancy::UserProfile},
};

// Credenciais (accounts) e perfis (users), ambos com id = id do usuário
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // Busca as credenciais pelo e-mail (já normalizado em minúsculas)
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        self.store
            .find_by_field(&CollectionRef::root(ACCOUNTS), "email", email)
            .await?
            .into_iter()
            .next()
            .map(|doc| doc.hydrate())
            .transpose()
    }

    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        self.store
            .get(&CollectionRef::root(USERS), user_id)
            .await?
            .map(|doc| doc.hydrate())
            .transpose()
    }

    // Membros de uma empresa, mais recentes primeiro
    pub async fn list_profiles_by_company(&self, company_id: Uuid) -> Result<Vec<UserProfile>, AppError> {
        self.store
            .find_by_field(&CollectionRef::root(USERS), "companyId", &company_id.to_string())
            .await?
            .into_iter()
            .map(|doc| doc.hydrate())
            .collect()
    }
}
