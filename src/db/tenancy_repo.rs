// src/db/tenancy_repo.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CollectionRef, DocumentStore, COMPANIES},
    models::tenancy::{Company, UpdateCompanyPayload},
};

#[derive(Clone)]
pub struct TenantRepository {
    store: Arc<dyn DocumentStore>,
}

impl TenantRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.store
            .get(&CollectionRef::root(COMPANIES), company_id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?
            .hydrate()
    }

    pub async fn update_company(
        &self,
        company_id: Uuid,
        payload: &UpdateCompanyPayload,
    ) -> Result<Company, AppError> {
        let patch = serde_json::to_value(payload)?;
        self.store
            .merge(&CollectionRef::root(COMPANIES), company_id, patch)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Empresa"),
                other => other,
            })?
            .hydrate()
    }
}
