use crate::fitment::BatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup around the configured extractor and oracle.
    pub scorer: BatchScorer,
    /// Request body limit for the multipart upload route.
    pub max_upload_bytes: usize,
}
