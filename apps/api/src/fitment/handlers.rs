//! Axum route handlers for the fitment API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::fitment::batch::{BatchResponse, CandidateDocument};
use crate::state::AppState;

const JD_FIELD: &str = "jd_text";
const CV_FIELD: &str = "cv_files";
const UNNAMED_FILE: &str = "unnamed.pdf";

/// POST /job_fitment_score
///
/// Multipart form: `jd_text` plus one or more `cv_files` parts. Responds 200
/// with one result per file even when individual files fail.
pub async fn handle_job_fitment_score(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, AppError> {
    let mut jd_text: Option<String> = None;
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(JD_FIELD) => {
                jd_text = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(CV_FIELD) => {
                let filename = field
                    .file_name()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(UNNAMED_FILE)
                    .to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                documents.push(CandidateDocument { filename, content });
            }
            other => debug!("Ignoring unexpected multipart field {:?}", other),
        }
    }

    let jd_text =
        jd_text.ok_or_else(|| AppError::Validation(format!("{JD_FIELD} is required")))?;

    let response = state.scorer.run(&jd_text, documents).await?;
    Ok(Json(response))
}

fn multipart_error(e: MultipartError) -> AppError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else if status.is_server_error() {
        AppError::Internal(anyhow::anyhow!("reading multipart body: {}", e.body_text()))
    } else {
        AppError::Validation(e.body_text())
    }
}
