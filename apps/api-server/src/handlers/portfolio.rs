//! Portfolio handlers: upload, view and download.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::header, web};
use futures::TryStreamExt;

use folio_core::routes::{download_url, portfolio_url};
use folio_shared::dto::{PortfolioResponse, RESUME_FIELD};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// The résumé part of a multipart upload.
struct ResumeUpload {
    filename: String,
    bytes: Vec<u8>,
}

/// POST /api/v1/resume/upload
pub async fn upload_resume(
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let upload = read_resume_field(payload, state.max_upload_bytes).await?;

    tracing::info!(
        filename = %upload.filename,
        size = upload.bytes.len(),
        "Received resume upload"
    );

    let artifact = state.portfolios.create(&upload.filename, upload.bytes).await?;
    let id = artifact.id.as_str();

    Ok(HttpResponse::Ok().json(PortfolioResponse::generated(
        id,
        portfolio_url(&state.base_url, id),
        download_url(&state.base_url, id),
    )))
}

/// GET /{portfolio_id}
pub async fn view_portfolio(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let html = state.portfolios.load_html(&path).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// GET /api/v1/portfolios/{portfolio_id}/download
pub async fn download_portfolio(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let html = state.portfolios.load_html(&id).await.map_err(|_| {
        AppError::NotFound("Portfolio HTML not found for download.".to_string())
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{id}.html\""),
        ))
        .body(html))
}

/// Read the `resumeFile` part, enforcing the size cap while streaming.
async fn read_resume_field(mut payload: Multipart, max_bytes: usize) -> AppResult<ResumeUpload> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .unwrap_or_default()
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > max_bytes {
                tracing::warn!(limit = max_bytes, "Upload exceeds size limit");
                return Err(AppError::BadRequest(format!(
                    "Uploaded file exceeds the maximum size of {max_bytes} bytes."
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(ResumeUpload { filename, bytes });
    }

    Err(AppError::BadRequest(format!(
        "Required part '{RESUME_FIELD}' is not present."
    )))
}
