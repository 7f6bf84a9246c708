// src/db/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::error::AppError;

// Coleções raiz (fora de qualquer empresa)
pub const COMPANIES: &str = "companies";
pub const USERS: &str = "users";
pub const ACCOUNTS: &str = "accounts";

/// Endereço de uma coleção: raiz ou aninhada sob uma empresa.
///
/// Toda leitura e escrita de dados de negócio passa um `company_id`;
/// o store nunca devolve documentos de outra empresa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub company_id: Option<Uuid>,
    pub name: &'static str,
}

impl CollectionRef {
    pub fn root(name: &'static str) -> Self {
        Self { company_id: None, name }
    }

    pub fn company(company_id: Uuid, name: &'static str) -> Self {
        Self { company_id: Some(company_id), name }
    }
}

/// Um documento armazenado. `data` guarda apenas os campos do registro;
/// id e carimbos de tempo são atribuídos pelo servidor.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Converte o documento no modelo tipado, injetando id, companyId e datas.
    pub fn hydrate<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let mut data = match self.data {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        data.insert("id".into(), json!(self.id));
        if let Some(company_id) = self.company_id {
            data.insert("companyId".into(), json!(company_id));
        }
        data.insert("createdAt".into(), json!(self.created_at));
        data.insert("updatedAt".into(), json!(self.updated_at));

        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Cria ou sobrescreve o documento com o id informado.
    Set { path: CollectionRef, id: Uuid, data: Value },
    /// Mescla os campos de primeiro nível; falha se o documento não existir.
    Merge { path: CollectionRef, id: Uuid, patch: Value },
    Delete { path: CollectionRef, id: Uuid },
}

/// Conjunto de escritas aplicado de forma atômica: ou todas, ou nenhuma.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: CollectionRef, id: Uuid, data: Value) -> &mut Self {
        self.ops.push(WriteOp::Set { path, id, data });
        self
    }

    pub fn merge(&mut self, path: CollectionRef, id: Uuid, patch: Value) -> &mut Self {
        self.ops.push(WriteOp::Merge { path, id, patch });
        self
    }

    pub fn delete(&mut self, path: CollectionRef, id: Uuid) -> &mut Self {
        self.ops.push(WriteOp::Delete { path, id });
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &CollectionRef, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Lista a coleção, mais recentes primeiro.
    async fn list(&self, path: &CollectionRef) -> Result<Vec<Document>, AppError>;

    /// Igualdade de texto num campo de primeiro nível (ex.: "email", "name").
    async fn find_by_field(
        &self,
        path: &CollectionRef,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, AppError>;

    async fn insert(&self, path: &CollectionRef, data: Value) -> Result<Document, AppError>;

    /// Escrita parcial; `AppError::NotFound` se o documento não existir.
    async fn merge(&self, path: &CollectionRef, id: Uuid, patch: Value) -> Result<Document, AppError>;

    /// Retorna `false` quando não havia nada para apagar.
    async fn delete(&self, path: &CollectionRef, id: Uuid) -> Result<bool, AppError>;

    async fn commit(&self, batch: WriteBatch) -> Result<(), AppError>;
}

/// Mesclagem rasa, a mesma semântica do operador `||` do JSONB.
pub(crate) fn merge_fields(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                target.insert(key, value);
            }
        }
        (target, patch) => *target = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Named {
        id: Uuid,
        company_id: Uuid,
        name: String,
    }

    #[test]
    fn hydrate_injects_server_fields() {
        let id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let doc = Document {
            id,
            company_id: Some(company_id),
            data: json!({ "name": "Eletrônicos" }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let named: Named = doc.hydrate().unwrap();
        assert_eq!(named.id, id);
        assert_eq!(named.company_id, company_id);
        assert_eq!(named.name, "Eletrônicos");
    }

    #[test]
    fn merge_is_shallow() {
        let mut data = json!({ "name": "Mouse", "price": "10", "tags": { "a": 1 } });
        merge_fields(&mut data, json!({ "price": "12", "tags": { "b": 2 } }));

        assert_eq!(data, json!({ "name": "Mouse", "price": "12", "tags": { "b": 2 } }));
    }
}
