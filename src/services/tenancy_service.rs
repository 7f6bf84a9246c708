// src/services/tenancy_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        store::{ACCOUNTS, USERS},
        CollectionRef, DocumentStore, ScopedRepository, TenantRepository, UserRepository, WriteBatch,
    },
    models::{
        auth::AccountData,
        rbac::Role,
        tenancy::{AddMemberPayload, Company, MeResponse, ProfileData, UpdateCompanyPayload, UserProfile},
    },
    services::auth::{hash_password, normalize_email},
};

#[derive(Clone)]
pub struct TenantService {
    store: Arc<dyn DocumentStore>,
    tenant_repo: TenantRepository,
    user_repo: UserRepository,
    role_repo: ScopedRepository<Role>,
    bcrypt_cost: u32,
}

impl TenantService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tenant_repo: TenantRepository,
        user_repo: UserRepository,
        role_repo: ScopedRepository<Role>,
        bcrypt_cost: u32,
    ) -> Self {
        Self { store, tenant_repo, user_repo, role_repo, bcrypt_cost }
    }

    /// Perfil do usuário autenticado; sem perfil não há empresa para operar.
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.user_repo
            .find_profile(user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<MeResponse, AppError> {
        let profile = self.profile(user_id).await?;
        let company = self.tenant_repo.find_company(profile.company_id).await?;
        Ok(MeResponse { profile, company })
    }

    pub async fn company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.tenant_repo.find_company(company_id).await
    }

    pub async fn update_company(
        &self,
        company_id: Uuid,
        payload: &UpdateCompanyPayload,
    ) -> Result<Company, AppError> {
        self.tenant_repo.update_company(company_id, payload).await
    }

    pub async fn list_members(&self, company_id: Uuid) -> Result<Vec<UserProfile>, AppError> {
        self.user_repo.list_profiles_by_company(company_id).await
    }

    /// Cria credenciais + perfil de um novo membro num único lote, respeitando
    /// o limite de usuários do plano e exigindo um cargo existente.
    pub async fn add_member(
        &self,
        company_id: Uuid,
        payload: &AddMemberPayload,
    ) -> Result<UserProfile, AppError> {
        let email = normalize_email(&payload.email);

        if self
            .role_repo
            .find_by_field(company_id, "name", &payload.role)
            .await?
            .is_none()
        {
            return Err(AppError::UnknownRole(payload.role.clone()));
        }

        let company = self.tenant_repo.find_company(company_id).await?;
        if let Some(max) = company.plan.max_users() {
            let members = self.user_repo.list_profiles_by_company(company_id).await?;
            if members.len() >= max {
                return Err(AppError::PlanUserLimit(max));
            }
        }

        if self.user_repo.find_account_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&payload.password, self.bcrypt_cost).await?;
        let user_id = Uuid::new_v4();

        let mut batch = WriteBatch::new();
        batch
            .set(
                CollectionRef::root(ACCOUNTS),
                user_id,
                serde_json::to_value(AccountData { email: &email, password_hash: &password_hash })?,
            )
            .set(
                CollectionRef::root(USERS),
                user_id,
                serde_json::to_value(ProfileData {
                    name: &payload.name,
                    email: &email,
                    phone: &payload.phone,
                    company_id,
                    role: &payload.role,
                })?,
            );

        self.store.commit(batch).await.map_err(|e| match e {
            AppError::EmailAlreadyExists => e,
            other => {
                tracing::error!("🔥 Falha ao adicionar membro na empresa {}: {:?}", company_id, other);
                AppError::AccountSetupFailed(other.to_string())
            }
        })?;

        tracing::info!("👤 Membro {} adicionado à empresa {}", user_id, company_id);

        self.profile(user_id).await
    }
}
