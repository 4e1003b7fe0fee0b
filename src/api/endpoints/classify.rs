//! Upload-and-classify handlers: the HTML form surface and the JSON API.

use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::pages;
use crate::api::types::AppContext;
use crate::pipeline::{Prediction, PipelineError};
use crate::storage::is_pdf_filename;

/// Fixed rejection message for filenames that do not end in `.pdf`.
pub const REJECTION_MESSAGE: &str = "File is not a .pdf document!";

/// Shown when a stored file turns out not to be a parseable PDF.
pub const INVALID_PDF_MESSAGE: &str = "The uploaded file is not a valid PDF.";

/// Shown when classification fails for an internal reason.
pub const FAILURE_MESSAGE: &str = "Something went wrong while classifying the document.";

/// Multipart field name carrying the PDF upload.
const PDF_FIELD: &str = "pdf";

/// One uploaded file: the client's filename plus the raw bytes.
struct PdfUpload {
    filename: String,
    bytes: Vec<u8>,
}

/// `GET /` — the upload form, no prediction.
pub async fn index() -> Html<String> {
    pages::render_index(None)
}

/// `POST /` — run the pipeline and re-render the view with the outcome.
///
/// The rejection and invalid-PDF outcomes are part of the view, not HTTP
/// failures: the page renders with the corresponding message and a 200.
pub async fn submit(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let upload = read_pdf_field(multipart).await?;

    if !is_pdf_filename(&upload.filename) {
        tracing::info!(filename = %upload.filename, "upload rejected: extension is not .pdf");
        return Ok(pages::render_index(Some(REJECTION_MESSAGE)));
    }

    let message = match run_pipeline(&ctx, &upload) {
        Ok(prediction) => prediction.category,
        Err(PipelineError::PdfParse(reason)) => {
            tracing::info!(filename = %upload.filename, %reason, "stored file is not a parseable PDF");
            INVALID_PDF_MESSAGE.to_string()
        }
        Err(PipelineError::PdfEncrypted) => {
            tracing::info!(filename = %upload.filename, "stored file is password-protected");
            INVALID_PDF_MESSAGE.to_string()
        }
        Err(e) => {
            tracing::error!(filename = %upload.filename, error = %e, "classification failed");
            FAILURE_MESSAGE.to_string()
        }
    };

    Ok(pages::render_index(Some(&message)))
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub category: String,
    pub index: usize,
    pub confidence: f32,
}

/// `POST /api/classify` — same pipeline, machine-readable response.
///
/// Unlike the HTML surface, failures here are real HTTP errors:
/// 400 `INVALID_EXTENSION` / `INVALID_PDF`, 500 for internal faults.
pub async fn classify_json(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let upload = read_pdf_field(multipart).await?;

    if !is_pdf_filename(&upload.filename) {
        tracing::info!(filename = %upload.filename, "upload rejected: extension is not .pdf");
        return Err(ApiError::InvalidExtension);
    }

    let prediction = run_pipeline(&ctx, &upload)?;

    Ok(Json(ClassifyResponse {
        category: prediction.category,
        index: prediction.index,
        confidence: prediction.confidence,
    }))
}

/// Store the upload and run extract → normalize → vectorize → predict.
fn run_pipeline(ctx: &AppContext, upload: &PdfUpload) -> Result<Prediction, PipelineError> {
    let stored = ctx.uploads.save(&upload.filename, &upload.bytes)?;
    ctx.engine.classify_file(&stored)
}

/// Pull the `pdf` field out of the multipart body.
async fn read_pdf_field(mut multipart: Multipart) -> Result<PdfUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| ApiError::BadRequest("upload field has no filename".into()))?
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

        return Ok(PdfUpload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::BadRequest(format!(
        "missing multipart field '{PDF_FIELD}'"
    )))
}
