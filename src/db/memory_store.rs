// src/db/memory_store.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{merge_fields, CollectionRef, Document, DocumentStore, WriteBatch, WriteOp},
};

type Collections = HashMap<CollectionRef, HashMap<Uuid, Document>>;

/// Store em memória: usado quando não há DATABASE_URL e nos testes.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_newest_first(mut docs: Vec<Document>) -> Vec<Document> {
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    docs
}

fn apply(collections: &mut Collections, op: WriteOp) -> Result<(), AppError> {
    let now = Utc::now();
    match op {
        WriteOp::Set { path, id, data } => {
            let docs = collections.entry(path).or_default();
            let created_at = docs.get(&id).map(|d| d.created_at).unwrap_or(now);
            docs.insert(
                id,
                Document { id, company_id: path.company_id, data, created_at, updated_at: now },
            );
        }
        WriteOp::Merge { path, id, patch } => {
            let doc = collections
                .get_mut(&path)
                .and_then(|docs| docs.get_mut(&id))
                .ok_or(AppError::NotFound("Documento"))?;
            merge_fields(&mut doc.data, patch);
            doc.updated_at = now;
        }
        WriteOp::Delete { path, id } => {
            if let Some(docs) = collections.get_mut(&path) {
                docs.remove(&id);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &CollectionRef, id: Uuid) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections.get(path).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn list(&self, path: &CollectionRef) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(path)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();
        Ok(sorted_newest_first(docs))
    }

    async fn find_by_field(
        &self,
        path: &CollectionRef,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(path)
            .map(|docs| {
                docs.values()
                    .filter(|d| d.data.get(field).and_then(Value::as_str) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(sorted_newest_first(docs))
    }

    async fn insert(&self, path: &CollectionRef, data: Value) -> Result<Document, AppError> {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            company_id: path.company_id,
            data,
            created_at: now,
            updated_at: now,
        };

        let mut collections = self.collections.write().await;
        collections.entry(*path).or_default().insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn merge(&self, path: &CollectionRef, id: Uuid, patch: Value) -> Result<Document, AppError> {
        let mut collections = self.collections.write().await;
        apply(&mut collections, WriteOp::Merge { path: *path, id, patch })?;
        collections
            .get(path)
            .and_then(|docs| docs.get(&id))
            .cloned()
            .ok_or(AppError::NotFound("Documento"))
    }

    async fn delete(&self, path: &CollectionRef, id: Uuid) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(path)
            .and_then(|docs| docs.remove(&id))
            .is_some())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;

        // Aplica numa cópia e só troca se todas as escritas passarem.
        let mut staged = collections.clone();
        for op in batch.ops {
            apply(&mut staged, op)?;
        }
        *collections = staged;
        Ok(())
    }
}
