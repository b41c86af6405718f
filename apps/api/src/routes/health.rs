use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "fitment-api"
    }))
}

/// GET /
pub async fn welcome_handler() -> Json<Value> {
    Json(json!({
        "message": "Job Fitment Scoring API. POST a job description (jd_text) and CV PDFs (cv_files) to /job_fitment_score."
    }))
}
