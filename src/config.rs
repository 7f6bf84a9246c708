// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{DocumentStore, MemoryStore, PgDocumentStore, ScopedRepository, TenantRepository, UserRepository},
    services::{
        auth::AuthService,
        crm_service::CrmService,
        dashboard_service::DashboardService,
        document_service::{DisabledGenerator, DocumentService, GeminiClient, TextGenerator, DEFAULT_GEMINI_BASE_URL},
        finance_service::FinanceService,
        inventory_service::InventoryService,
        rbac_service::RbacService,
        sales_service::SalesService,
        tenancy_service::TenantService,
    },
};

/// Configuração lida das variáveis de ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub bcrypt_cost: u32,
    pub token_ttl_days: i64,
    pub genai_api_key: Option<String>,
    pub genai_model: String,
    pub genai_base_url: String,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválido ({}): {}", name, raw, e)),
        None => Ok(default),
    }
}

// Validade do token em dias: positiva e representável como data de expiração
fn token_ttl(days: i64) -> anyhow::Result<i64> {
    let fits = days > 0
        && chrono::TimeDelta::try_days(days)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .is_some();
    anyhow::ensure!(fits, "TOKEN_TTL_DAYS fora da faixa permitida: {}", days);
    Ok(days)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: optional_var("DATABASE_URL"),
            jwt_secret: optional_var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: optional_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            bcrypt_cost: parsed_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            token_ttl_days: token_ttl(parsed_var("TOKEN_TTL_DAYS", 7)?)?,
            genai_api_key: optional_var("GENAI_API_KEY"),
            genai_model: optional_var("GENAI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            genai_base_url: optional_var("GENAI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub rbac_service: RbacService,
    pub inventory_service: InventoryService,
    pub crm_service: CrmService,
    pub sales_service: SalesService,
    pub finance_service: FinanceService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    /// Conecta ao banco (ou cai no store em memória) e monta os serviços.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgDocumentStore::new(db_pool))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL não definida: usando store em memória (dados não persistem)");
                Arc::new(MemoryStore::new())
            }
        };

        let generator: Arc<dyn TextGenerator> = match &config.genai_api_key {
            Some(api_key) => Arc::new(GeminiClient::new(
                config.genai_base_url.as_str(),
                config.genai_model.as_str(),
                api_key.as_str(),
            )),
            None => {
                tracing::warn!("⚠️ GENAI_API_KEY não definida: a geração de documentos ficará indisponível");
                Arc::new(DisabledGenerator)
            }
        };

        Ok(Self::with_store(config, store, generator))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(config: &Config, store: Arc<dyn DocumentStore>, generator: Arc<dyn TextGenerator>) -> Self {
        let user_repo = UserRepository::new(store.clone());
        let tenant_repo = TenantRepository::new(store.clone());

        let auth_service = AuthService::new(
            store.clone(),
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.bcrypt_cost,
            config.token_ttl_days,
        );
        let tenant_service = TenantService::new(
            store.clone(),
            tenant_repo,
            user_repo.clone(),
            ScopedRepository::new(store.clone()),
            config.bcrypt_cost,
        );
        let rbac_service =
            RbacService::new(store.clone(), ScopedRepository::new(store.clone()), user_repo);
        let inventory_service =
            InventoryService::new(ScopedRepository::new(store.clone()), ScopedRepository::new(store.clone()));
        let crm_service = CrmService::new(ScopedRepository::new(store.clone()));
        let sales_service = SalesService::new(store.clone());
        let finance_service = FinanceService::new(ScopedRepository::new(store.clone()));
        let dashboard_service =
            DashboardService::new(sales_service.clone(), crm_service.clone(), inventory_service.clone());
        let document_service = DocumentService::new(generator);

        Self {
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            tenant_service,
            rbac_service,
            inventory_service,
            crm_service,
            sales_service,
            finance_service,
            dashboard_service,
            document_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ttl_must_be_a_reachable_expiry() {
        assert_eq!(token_ttl(7).unwrap(), 7);
        assert!(token_ttl(0).is_err());
        assert!(token_ttl(-1).is_err());
        assert!(token_ttl(i64::MAX).is_err());
        // Cabe num TimeDelta, mas passa do maior DateTime
        assert!(token_ttl(200_000_000).is_err());
    }
}
