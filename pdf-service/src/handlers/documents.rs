use crate::dtos::{AddTextRequest, CreatePdfResponse};
use crate::models::DocumentId;
use crate::services::pdf::{self, TextOverlay};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

pub async fn create_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let id = DocumentId::generate();
    let bytes = pdf::empty_document()?;
    let size = bytes.len();

    state
        .storage
        .upload(&id.storage_key(), bytes)
        .await
        .map_err(|e| {
            tracing::error!(document_id = %id, error = %e, "Failed to persist new document");
            e
        })?;

    metrics::counter!("pdf_documents_created_total").increment(1);
    tracing::info!(document_id = %id, size = size, "Document created");

    Ok(Json(CreatePdfResponse {
        pdf_id: id.to_string(),
    }))
}

pub async fn fetch_pdf(
    State(state): State<AppState>,
    Path(pdf_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&pdf_id)?;

    let bytes = state.storage.download(&id.storage_key()).await.map_err(|e| {
        tracing::warn!(document_id = %id, error = %e, "Failed to fetch document");
        e
    })?;

    tracing::info!(document_id = %id, size = bytes.len(), "Document fetched");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    ))
}

pub async fn add_text(
    State(state): State<AppState>,
    Path(pdf_id): Path<String>,
    Json(request): Json<AddTextRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&pdf_id)?;
    let key = id.storage_key();

    let mut overlay = TextOverlay::new(request.text);
    if let Some(page) = request.page {
        overlay.page = page;
    }
    if let Some(x) = request.x {
        overlay.x = x;
    }
    if let Some(y) = request.y {
        overlay.y = y;
    }
    if let Some(size) = request.size {
        overlay.size = size;
    }

    // Hold the document's lock across the read-modify-write so concurrent
    // appends to the same document cannot lose each other's overlays.
    let _guard = state.locks.acquire(&key).await;

    let bytes = state.storage.download(&key).await.map_err(|e| {
        tracing::warn!(document_id = %id, error = %e, "Failed to load document for append");
        e
    })?;

    let updated = pdf::overlay_text(&bytes, &overlay)?;

    state.storage.upload(&key, updated).await.map_err(|e| {
        tracing::error!(document_id = %id, error = %e, "Failed to persist appended document");
        e
    })?;

    metrics::counter!("pdf_text_overlays_total").increment(1);
    tracing::info!(document_id = %id, page = overlay.page, "Text appended");

    Ok(StatusCode::OK)
}

fn parse_id(pdf_id: &str) -> Result<DocumentId, AppError> {
    pdf_id
        .parse()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid document id: {}", pdf_id)))
}
