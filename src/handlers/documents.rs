// src/handlers/documents.rs

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PageDocuments, RequirePage},
    },
    models::document::{DocumentRequest, DocumentResponse},
};

// POST /api/documents/generate
#[utoipa::path(
    post,
    path = "/api/documents/generate",
    tag = "Documents",
    request_body = DocumentRequest,
    responses(
        (status = 200, description = "Texto do documento gerado", body = DocumentResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 502, description = "Falha ao gerar o documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_document(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePage<PageDocuments>,
    Json(payload): Json<DocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let document = app_state
        .document_service
        .generate(&payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(document))
}
