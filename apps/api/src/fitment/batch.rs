//! Scores every CV in a request against one job description.
//!
//! Flow per document: extract text → oracle score (timeout-bounded) → validate.
//!
//! Items run concurrently on a `JoinSet`, bounded by a semaphore. Every failure
//! is item-local: it becomes that document's `error` entry and the rest of the
//! batch carries on. Results are reassembled into input order.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::fitment::extractor::{ExtractionError, TextExtractor};
use crate::fitment::oracle::{OracleError, ScoringOracle};
use crate::fitment::validator::{validate, ScoreRangeError, ValidatedScores};

/// Error text for a slot whose task died without reporting.
const LOST_ITEM_MESSAGE: &str = "internal error while scoring this document";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One uploaded CV. `filename` is for display only and need not be unique.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub filename: String,
    pub content: Bytes,
}

/// Outcome for one document: either all six scores plus total, or an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: ScoreOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreOutcome {
    Scored(ValidatedScores),
    Failed { error: String },
}

impl ScoreResult {
    pub fn scored(filename: String, scores: ValidatedScores) -> Self {
        Self {
            filename,
            outcome: ScoreOutcome::Scored(scores),
        }
    }

    pub fn failed(filename: String, error: impl Into<String>) -> Self {
        Self {
            filename,
            outcome: ScoreOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn scores(&self) -> Option<&ValidatedScores> {
        match &self.outcome {
            ScoreOutcome::Scored(scores) => Some(scores),
            ScoreOutcome::Failed { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ScoreOutcome::Scored(_) => None,
            ScoreOutcome::Failed { error } => Some(error),
        }
    }
}

/// `results[i]` always belongs to `documents[i]` of the request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub results: Vec<ScoreResult>,
}

/// Failure of a single document. Never escapes the orchestrator.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Oracle(#[from] OracleError),

    #[error("invalid score from scoring backend: {0}")]
    ScoreRange(#[from] ScoreRangeError),
}

/// Request-level rejection, raised before any document is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error("jd_text must not be empty")]
    EmptyJobDescription,

    #[error("at least one file is required in cv_files")]
    NoDocuments,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchLimits {
    /// Maximum documents processed at once. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Upper bound on a single oracle call.
    pub oracle_timeout: Duration,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Runs the extract → score → validate pipeline over a batch of CVs.
///
/// Cheap to clone; carried in `AppState`.
#[derive(Clone)]
pub struct BatchScorer {
    extractor: Arc<dyn TextExtractor>,
    oracle: Arc<dyn ScoringOracle>,
    limits: BatchLimits,
}

impl BatchScorer {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        oracle: Arc<dyn ScoringOracle>,
        limits: BatchLimits,
    ) -> Self {
        Self {
            extractor,
            oracle,
            limits,
        }
    }

    /// Scores `documents` against `job_description`.
    ///
    /// Returns exactly one result per document, in input order. Only an empty
    /// job description or an empty document list fails the whole call.
    ///
    /// Dropping the returned future aborts every in-flight item.
    pub async fn run(
        &self,
        job_description: &str,
        documents: Vec<CandidateDocument>,
    ) -> Result<BatchResponse, BatchError> {
        if job_description.trim().is_empty() {
            return Err(BatchError::EmptyJobDescription);
        }
        if documents.is_empty() {
            return Err(BatchError::NoDocuments);
        }

        let batch_id = Uuid::new_v4();
        let concurrency = self.limits.concurrency.max(1);
        info!(
            "Batch {batch_id}: scoring {} document(s), concurrency {concurrency}",
            documents.len()
        );

        let job_description: Arc<str> = Arc::from(job_description);
        let permits = Arc::new(Semaphore::new(concurrency));
        let filenames: Vec<String> = documents.iter().map(|d| d.filename.clone()).collect();

        let mut tasks = JoinSet::new();
        for (index, document) in documents.into_iter().enumerate() {
            let scorer = self.clone();
            let job_description = Arc::clone(&job_description);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed, so this only waits for a slot.
                let _permit = permits.acquire_owned().await;
                let result = scorer.score_document(&job_description, document).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<ScoreResult>> = filenames.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!("Batch {batch_id}: scoring task failed: {e}"),
            }
        }

        let results: Vec<ScoreResult> = slots
            .into_iter()
            .zip(filenames)
            .map(|(slot, filename)| {
                slot.unwrap_or_else(|| ScoreResult::failed(filename, LOST_ITEM_MESSAGE))
            })
            .collect();

        let scored = results.iter().filter(|r| r.scores().is_some()).count();
        info!(
            "Batch {batch_id}: done, {scored} scored, {} failed",
            results.len() - scored
        );

        Ok(BatchResponse { results })
    }

    /// Processes one document and folds any failure into its result.
    async fn score_document(
        &self,
        job_description: &str,
        document: CandidateDocument,
    ) -> ScoreResult {
        let CandidateDocument { filename, content } = document;
        match self.try_score(job_description, content).await {
            Ok(scores) => {
                debug!("Scored '{filename}': total {}", scores.total);
                ScoreResult::scored(filename, scores)
            }
            Err(e) => {
                warn!("Failed to score '{filename}': {e}");
                ScoreResult::failed(filename, e.to_string())
            }
        }
    }

    async fn try_score(
        &self,
        job_description: &str,
        content: Bytes,
    ) -> Result<ValidatedScores, ItemError> {
        let resume_text = self.extractor.extract(content).await?;

        let timeout = self.limits.oracle_timeout;
        let raw = tokio::time::timeout(timeout, self.oracle.score(&resume_text, job_description))
            .await
            .map_err(|_| OracleError::Timeout(timeout))??;

        Ok(validate(&raw)?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
