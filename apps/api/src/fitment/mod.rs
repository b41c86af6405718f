// Candidate fitment scoring: CV text extraction, LLM scoring, range validation
// and per-batch orchestration. All LLM calls go through llm_client.

pub mod batch;
pub mod criteria;
pub mod extractor;
pub mod handlers;
pub mod oracle;
pub mod prompts;
pub mod validator;

#[cfg(test)]
pub mod test_support;

pub use batch::{BatchLimits, BatchScorer};
pub use extractor::PdfTextExtractor;
pub use oracle::LlmScoringOracle;
