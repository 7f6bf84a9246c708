// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        store::{ACCOUNTS, COMPANIES, USERS},
        CollectionRef, DocumentStore, ScopedRepository, UserRepository, WriteBatch,
    },
    models::{
        auth::{AccountData, Claims, RegisterResponse, RegisterUserPayload},
        rbac::{default_roles, Role, RoleData, ADMIN_ROLE},
        tenancy::{CompanyData, ProfileData},
    },
};

/// E-mails são comparados sem diferenciar maiúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// O bcrypt é CPU-bound: roda fora do executor assíncrono
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn DocumentStore>,
    user_repo: UserRepository,
    jwt_secret: String,
    bcrypt_cost: u32,
    token_ttl_days: i64,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        user_repo: UserRepository,
        jwt_secret: String,
        bcrypt_cost: u32,
        token_ttl_days: i64,
    ) -> Self {
        Self { store, user_repo, jwt_secret, bcrypt_cost, token_ttl_days }
    }

    /// Cria credenciais, empresa, perfil (Admin) e cargos padrão num único lote.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<RegisterResponse, AppError> {
        let email = normalize_email(&payload.email);

        if self.user_repo.find_account_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&payload.password, self.bcrypt_cost).await?;

        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();

        let mut batch = WriteBatch::new();
        batch
            .set(
                CollectionRef::root(ACCOUNTS),
                user_id,
                serde_json::to_value(AccountData { email: &email, password_hash: &password_hash })?,
            )
            .set(
                CollectionRef::root(COMPANIES),
                company_id,
                serde_json::to_value(CompanyData {
                    name: &payload.company_name,
                    plan: payload.plan,
                    owner_id: user_id,
                })?,
            )
            .set(
                CollectionRef::root(USERS),
                user_id,
                serde_json::to_value(ProfileData {
                    name: &payload.name,
                    email: &email,
                    phone: &payload.phone,
                    company_id,
                    role: ADMIN_ROLE,
                })?,
            );

        for (name, permissions) in default_roles() {
            batch.set(
                ScopedRepository::<Role>::path(company_id),
                Uuid::new_v4(),
                serde_json::to_value(RoleData { name, permissions: &permissions })?,
            );
        }

        self.store.commit(batch).await.map_err(|e| match e {
            AppError::EmailAlreadyExists => e,
            other => {
                tracing::error!("🔥 Falha no lote de criação de conta: {:?}", other);
                AppError::AccountSetupFailed(other.to_string())
            }
        })?;

        tracing::info!("✅ Conta criada: usuário {} / empresa {}", user_id, company_id);

        Ok(RegisterResponse {
            token: self.create_token(user_id)?,
            user_id,
            company_id,
        })
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let account = self
            .user_repo
            .find_account_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = account.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(account.id)
    }

    /// Decodifica o token e devolve o id do usuário.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims.sub)
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = chrono::TimeDelta::try_days(self.token_ttl_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow::anyhow!("Validade do token inválida: {} dias", self.token_ttl_days))?;

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
