// src/db/pg_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CollectionRef, Document, DocumentStore, WriteBatch, WriteOp, ACCOUNTS},
};

// Uma linha da tabela 'documents'
#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    company_id: Option<Uuid>,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            company_id: row.company_id,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, company_id, data, created_at, updated_at";

/// Store sobre uma única tabela JSONB. A chave é (collection, id) e todo
/// filtro inclui `company_id`, então um id de outra empresa nunca casa.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply(tx: &mut Transaction<'_, Postgres>, op: WriteOp) -> Result<(), AppError> {
        match op {
            WriteOp::Set { path, id, data } => {
                sqlx::query(
                    r#"
                    INSERT INTO documents (collection, company_id, id, data)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (collection, id)
                    DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
                    "#,
                )
                .bind(path.name)
                .bind(path.company_id)
                .bind(id)
                .bind(data)
                .execute(&mut **tx)
                .await
                .map_err(map_unique_violation(path))?;
            }
            WriteOp::Merge { path, id, patch } => {
                let result = sqlx::query(
                    r#"
                    UPDATE documents
                    SET data = data || $4, updated_at = NOW()
                    WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 AND id = $3
                    "#,
                )
                .bind(path.name)
                .bind(path.company_id)
                .bind(id)
                .bind(patch)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound("Documento"));
                }
            }
            WriteOp::Delete { path, id } => {
                sqlx::query(
                    "DELETE FROM documents WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 AND id = $3",
                )
                .bind(path.name)
                .bind(path.company_id)
                .bind(id)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }
}

// O índice único de e-mail só existe para a coleção de contas.
fn map_unique_violation(path: CollectionRef) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() && path.name == ACCOUNTS {
                return AppError::EmailAlreadyExists;
            }
        }
        e.into()
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, path: &CollectionRef, id: Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 AND id = $3"
        ))
        .bind(path.name)
        .bind(path.company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn list(&self, path: &CollectionRef) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 ORDER BY created_at DESC, id"
        ))
        .bind(path.name)
        .bind(path.company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn find_by_field(
        &self,
        path: &CollectionRef,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 AND data ->> $3 = $4 ORDER BY created_at DESC, id"
        ))
        .bind(path.name)
        .bind(path.company_id)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn insert(&self, path: &CollectionRef, data: Value) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO documents (collection, company_id, id, data) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(path.name)
        .bind(path.company_id)
        .bind(Uuid::new_v4())
        .bind(data)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation(*path))?;

        Ok(row.into())
    }

    async fn merge(&self, path: &CollectionRef, id: Uuid, patch: Value) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            UPDATE documents
            SET data = data || $4, updated_at = NOW()
            WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 AND id = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(path.name)
        .bind(path.company_id)
        .bind(id)
        .bind(patch)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::from).ok_or(AppError::NotFound("Documento"))
    }

    async fn delete(&self, path: &CollectionRef, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND company_id IS NOT DISTINCT FROM $2 AND id = $3",
        )
        .bind(path.name)
        .bind(path.company_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for op in batch.ops {
            // Se falhar aqui, o tx sofre rollback automático ao sair do escopo (drop)
            Self::apply(&mut tx, op).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
