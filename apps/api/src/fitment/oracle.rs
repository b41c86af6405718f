//! Scoring oracle, the external judgment capability.
//!
//! The batch orchestrator only depends on the `ScoringOracle` trait; the
//! default backend asks the LLM for the six raw sub-scores as JSON.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::fitment::criteria::Criterion;
use crate::fitment::prompts::{build_scoring_prompt, scoring_system};
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("scoring backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("scoring backend did not answer within {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Unvalidated oracle output. Values are kept as raw JSON so the validator can
/// tell a non-numeric answer apart from an out-of-range one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScoreOutput {
    #[serde(default)]
    pub skill_score: Value,
    #[serde(default)]
    pub experience_score: Value,
    #[serde(default, alias = "achievment_score")]
    pub achievement_score: Value,
    #[serde(default)]
    pub communication_score: Value,
    #[serde(default)]
    pub education_score: Value,
    #[serde(default, alias = "overall_fit_score")]
    pub overallfit_score: Value,
    /// Model rationale. Logged, never returned to clients.
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl RawScoreOutput {
    pub fn get(&self, criterion: Criterion) -> &Value {
        match criterion {
            Criterion::Skill => &self.skill_score,
            Criterion::Experience => &self.experience_score,
            Criterion::Achievement => &self.achievement_score,
            Criterion::Communication => &self.communication_score,
            Criterion::Education => &self.education_score,
            Criterion::OverallFit => &self.overallfit_score,
        }
    }
}

/// JSON field the oracle uses for each criterion.
pub fn field_name(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Skill => "skill_score",
        Criterion::Experience => "experience_score",
        Criterion::Achievement => "achievement_score",
        Criterion::Communication => "communication_score",
        Criterion::Education => "education_score",
        Criterion::OverallFit => "overallfit_score",
    }
}

/// Scores one resume against one job description.
///
/// Implementations must fail with `OracleError` rather than return data they
/// could not obtain. Results are not assumed to be deterministic.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        job_description_text: &str,
    ) -> Result<RawScoreOutput, OracleError>;
}

/// Oracle backed by the shared `LlmClient`.
pub struct LlmScoringOracle {
    llm: LlmClient,
}

impl LlmScoringOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ScoringOracle for LlmScoringOracle {
    async fn score(
        &self,
        resume_text: &str,
        job_description_text: &str,
    ) -> Result<RawScoreOutput, OracleError> {
        let prompt = build_scoring_prompt(resume_text, job_description_text);
        let raw: RawScoreOutput = self.llm.call_json(&prompt, &scoring_system()).await?;
        if let Some(reasoning) = &raw.reasoning {
            debug!("Oracle reasoning ({}): {}", self.llm.model(), reasoning);
        }
        Ok(raw)
    }
}
