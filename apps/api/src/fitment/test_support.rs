//! Test doubles shared by the fitment and routes tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;

use crate::fitment::extractor::{ExtractionError, TextExtractor};
use crate::fitment::oracle::{OracleError, RawScoreOutput, ScoringOracle};
use crate::llm_client::LlmError;

/// Builds a small but well-formed PDF with one Helvetica text line per page.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    // 1: catalog, 2: page tree, 3: font, then (page, content) pairs.
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + i * 2))
        .collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + i * 2;
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        let stream = format!("BT /F1 12 Tf 72 720 Td ({escaped}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    out.into_bytes()
}

/// Treats `%PDF`-prefixed bytes as a document whose text is the rest of the
/// bytes. `%CRASH` panics like a broken parser. Anything else fails the way a
/// corrupt upload would.
#[derive(Default)]
pub struct StubExtractor {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if document.is_empty() {
            return Err(ExtractionError::Empty);
        }
        if document.starts_with(b"%CRASH") {
            panic!("parser crashed");
        }
        match document.strip_prefix(b"%PDF".as_slice()) {
            Some(rest) => Ok(String::from_utf8_lossy(rest).trim().to_string()),
            None => Err(ExtractionError::Unreadable("missing PDF header".to_string())),
        }
    }
}

/// Answers according to markers in the resume text:
/// - `HANG` never answers
/// - `SLOW<ms>` waits that many milliseconds first
/// - `OVER` reports a skill score of 25
/// - `WORDS` reports a non-numeric experience score
/// - `DOWN` fails as the backend would
/// - `BOOM` panics
/// - anything else gets the standard scores (18, 15, 12, 16, 8, 7)
#[derive(Default)]
pub struct ScriptedOracle {
    pub calls: AtomicUsize,
    pub in_flight: Arc<AtomicUsize>,
}

pub const STANDARD_TOTAL: f64 = 76.0;

struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScoringOracle for ScriptedOracle {
    async fn score(
        &self,
        resume_text: &str,
        _job_description_text: &str,
    ) -> Result<RawScoreOutput, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight::enter(&self.in_flight);

        if resume_text.contains("BOOM") {
            panic!("oracle blew up");
        }
        if resume_text.contains("HANG") {
            std::future::pending::<()>().await;
        }
        if let Some(ms) = slow_millis(resume_text) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if resume_text.contains("DOWN") {
            return Err(OracleError::Backend(LlmError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            }));
        }

        let mut raw: RawScoreOutput = serde_json::from_value(json!({
            "reasoning": "scripted",
            "skill_score": 18,
            "experience_score": 15,
            "achievement_score": 12,
            "communication_score": 16,
            "education_score": 8,
            "overallfit_score": 7
        }))
        .expect("scripted scores decode");

        if resume_text.contains("OVER") {
            raw.skill_score = json!(25);
        }
        if resume_text.contains("WORDS") {
            raw.experience_score = json!("quite a lot");
        }
        Ok(raw)
    }
}

fn slow_millis(text: &str) -> Option<u64> {
    let start = text.find("SLOW")? + 4;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn document(filename: &str, body: &str) -> crate::fitment::batch::CandidateDocument {
    crate::fitment::batch::CandidateDocument {
        filename: filename.to_string(),
        content: Bytes::from(body.to_string()),
    }
}
