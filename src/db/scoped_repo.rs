// src/db/scoped_repo.rs

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CollectionRef, DocumentStore},
};

/// Um registro que vive numa sub-coleção da empresa.
pub trait CompanyRecord: DeserializeOwned + Send {
    const COLLECTION: &'static str;
    /// Nome exibido nas mensagens de erro ("Produto não encontrado.").
    const LABEL: &'static str;
}

/// Repositório CRUD de uma sub-coleção. Toda operação exige o `company_id`
/// do chamador, que vem do perfil autenticado e nunca do corpo da requisição.
pub struct ScopedRepository<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ScopedRepository<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), _record: PhantomData }
    }
}

impl<T: CompanyRecord> ScopedRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, _record: PhantomData }
    }

    pub fn path(company_id: Uuid) -> CollectionRef {
        CollectionRef::company(company_id, T::COLLECTION)
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<T>, AppError> {
        self.store
            .list(&Self::path(company_id))
            .await?
            .into_iter()
            .map(|doc| doc.hydrate())
            .collect()
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<T, AppError> {
        self.store
            .get(&Self::path(company_id), id)
            .await?
            .ok_or(AppError::NotFound(T::LABEL))?
            .hydrate()
    }

    pub async fn find_by_field(
        &self,
        company_id: Uuid,
        field: &str,
        value: &str,
    ) -> Result<Option<T>, AppError> {
        self.store
            .find_by_field(&Self::path(company_id), field, value)
            .await?
            .into_iter()
            .next()
            .map(|doc| doc.hydrate())
            .transpose()
    }

    pub async fn create<P: Serialize>(&self, company_id: Uuid, payload: &P) -> Result<T, AppError> {
        let data = serde_json::to_value(payload)?;
        self.store
            .insert(&Self::path(company_id), data)
            .await?
            .hydrate()
    }

    /// Escrita parcial: só os campos presentes no payload são alterados.
    pub async fn update<P: Serialize>(
        &self,
        company_id: Uuid,
        id: Uuid,
        patch: &P,
    ) -> Result<T, AppError> {
        let patch = serde_json::to_value(patch)?;
        self.merge_value(company_id, id, patch).await
    }

    pub async fn merge_value(&self, company_id: Uuid, id: Uuid, patch: Value) -> Result<T, AppError> {
        self.store
            .merge(&Self::path(company_id), id, patch)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(T::LABEL),
                other => other,
            })?
            .hydrate()
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if self.store.delete(&Self::path(company_id), id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(T::LABEL))
        }
    }
}
