// src/services/document_service.rs

use std::{fmt::Write as _, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::{
    common::error::AppError,
    models::{
        document::{DocumentLine, DocumentRequest, DocumentResponse, DocumentStyle},
        sales::LineItem,
    },
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("serviço de geração não configurado")]
    NotConfigured,

    #[error("falha de transporte: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resposta HTTP {0}")]
    Status(u16),

    #[error("resposta sem texto gerado")]
    EmptyCandidate,
}

/// Serviço externo que transforma um prompt em texto.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// --- Gemini (generateContent) ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::Status(response.status().as_u16()));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyCandidate);
        }
        Ok(text)
    }
}

/// Usado quando não há GENAI_API_KEY: toda geração falha.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

// --- Prompt ---

fn write_products(prompt: &mut String, products: &[DocumentLine]) {
    for p in products {
        let _ = writeln!(prompt, "- Produto: {}", p.name);
        let _ = writeln!(prompt, "  Quantidade: {}", p.quantity);
        let _ = writeln!(prompt, "  Preço Unitário: R$ {:.2}", p.price);
    }
}

/// Monta o prompt fixo do estilo pedido com os dados da venda.
pub fn render_prompt(req: &DocumentRequest, total: Decimal, date: &str) -> String {
    let mut prompt = String::new();

    match req.style {
        DocumentStyle::Informative => {
            prompt.push_str(
                "Você é um assistente de IA especializado em gerar documentos de vendas informativos, \
                 semelhante a uma 'Nota Fiscal', para empresas.\n\n\
                 Gere um documento com base nas seguintes informações:\n\n",
            );
            let _ = writeln!(prompt, "**Dados da Empresa:**\nNome: {}\n", req.company_name);
            let _ = writeln!(prompt, "**Dados do Cliente:**\nNome: {}\n", req.customer_name);
            let _ = writeln!(prompt, "**Detalhes da Transação:**\nData: {}\n", date);
            prompt.push_str("**Produtos:**\n");
            write_products(&mut prompt, &req.products);
            let _ = writeln!(prompt, "\n**Resumo Financeiro:**\nValor Total: R$ {:.2}\n", total);
            prompt.push_str(
                "Observação: Este documento não possui valor fiscal.\n\n\
                 Certifique-se de que o documento inclua todos os detalhes fornecidos de maneira clara \
                 e organizada. O documento deve parecer profissional e ser fácil de entender.\n",
            );
        }
        DocumentStyle::Receipt => {
            prompt.push_str(
                "Você é um assistente de IA que escreve recibos curtos e objetivos para pequenas empresas.\n\n\
                 Gere um recibo simples com as seguintes informações:\n\n",
            );
            let _ = writeln!(prompt, "Empresa: {}", req.company_name);
            let _ = writeln!(prompt, "Cliente: {}", req.customer_name);
            let _ = writeln!(prompt, "Data: {}\n", date);
            prompt.push_str("Itens:\n");
            write_products(&mut prompt, &req.products);
            let _ = writeln!(prompt, "\nValor Total Recebido: R$ {:.2}\n", total);
            prompt.push_str(
                "O recibo deve caber em poucas linhas, declarar o recebimento do valor total \
                 e terminar com um espaço para assinatura.\n",
            );
        }
    }

    prompt
}

pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone)]
pub struct DocumentService {
    generator: Arc<dyn TextGenerator>,
}

impl DocumentService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, req: &DocumentRequest) -> Result<DocumentResponse, AppError> {
        let total = match req.total_amount {
            Some(total) => total,
            None => req.items_total().ok_or_else(|| {
                AppError::field("products", "range", "O total excede o valor máximo permitido.")
            })?,
        };
        let date = req
            .date
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| Utc::now().format(DATE_FORMAT).to_string());

        let prompt = render_prompt(req, total, &date);

        match self.generator.generate(&prompt).await {
            Ok(document_text) => Ok(DocumentResponse { document_text }),
            Err(e) => {
                tracing::error!("🔥 Falha ao gerar documento para '{}': {}", req.customer_name, e);
                Err(AppError::DocumentGenerationFailed(e.to_string()))
            }
        }
    }

    /// Gera o documento de um pedido/venda gravado; os itens já trazem o retrato do preço.
    pub async fn generate_for_record(
        &self,
        company_name: &str,
        customer_name: &str,
        items: &[LineItem],
        total: Decimal,
        created_at: DateTime<Utc>,
        style: DocumentStyle,
    ) -> Result<DocumentResponse, AppError> {
        let req = DocumentRequest {
            company_name: company_name.to_string(),
            customer_name: customer_name.to_string(),
            products: items
                .iter()
                .map(|item| DocumentLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            total_amount: Some(total),
            date: Some(created_at.format(DATE_FORMAT).to_string()),
            style,
        };
        self.generate(&req).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Guarda o último prompt e devolve um texto fixo
    #[derive(Default)]
    struct RecordingGenerator {
        last_prompt: Mutex<Option<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok("DOCUMENTO".into())
        }
    }

    fn request(style: DocumentStyle) -> DocumentRequest {
        DocumentRequest {
            company_name: "ACME LTDA".into(),
            customer_name: "Liam Johnson".into(),
            products: vec![
                DocumentLine { name: "Mouse".into(), quantity: 2, price: Decimal::new(4550, 2) },
                DocumentLine { name: "Teclado".into(), quantity: 1, price: Decimal::new(19990, 2) },
            ],
            total_amount: None,
            date: Some("14/03/2025".into()),
            style,
        }
    }

    #[test]
    fn informative_prompt_carries_every_detail() {
        let prompt = render_prompt(&request(DocumentStyle::Informative), Decimal::new(29090, 2), "14/03/2025");
        assert!(prompt.contains("Nome: ACME LTDA"));
        assert!(prompt.contains("Nome: Liam Johnson"));
        assert!(prompt.contains("Data: 14/03/2025"));
        assert!(prompt.contains("- Produto: Teclado"));
        assert!(prompt.contains("Preço Unitário: R$ 45.50"));
        assert!(prompt.contains("Valor Total: R$ 290.90"));
        assert!(prompt.contains("não possui valor fiscal"));
    }

    #[test]
    fn receipt_prompt_is_a_different_template() {
        let prompt = render_prompt(&request(DocumentStyle::Receipt), Decimal::ONE, "01/01/2025");
        assert!(prompt.contains("recibo"));
        assert!(!prompt.contains("Nota Fiscal"));
    }

    #[tokio::test]
    async fn total_defaults_to_the_items_sum() {
        let generator = Arc::new(RecordingGenerator::default());
        let service = DocumentService::new(generator.clone());

        let response = service.generate(&request(DocumentStyle::Informative)).await.unwrap();
        assert_eq!(response.document_text, "DOCUMENTO");

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Valor Total: R$ 290.90"));
    }

    #[tokio::test]
    async fn overflowing_items_total_is_a_validation_error() {
        let generator = Arc::new(RecordingGenerator::default());
        let service = DocumentService::new(generator.clone());
        let mut req = request(DocumentStyle::Receipt);
        req.products[0].price = Decimal::MAX;

        let err = service.generate(&req).await.unwrap_err();
        assert!(matches!(&err, AppError::ValidationError(e) if e.field_errors().contains_key("products")));
        assert!(generator.last_prompt.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn generator_failures_become_the_fixed_error() {
        let service = DocumentService::new(Arc::new(DisabledGenerator));
        let err = service.generate(&request(DocumentStyle::Receipt)).await.unwrap_err();
        assert!(matches!(err, AppError::DocumentGenerationFailed(_)));
    }
}
