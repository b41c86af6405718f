// Prompt text for the scoring oracle.

use crate::fitment::criteria::Criterion;
use crate::fitment::oracle::field_name;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const SCORER_ROLE: &str = "You are an experienced technical recruiter. \
    You score a candidate's resume against a job description on fixed criteria.";

/// System instruction for scoring calls.
pub fn scoring_system() -> String {
    format!("{SCORER_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Builds the user prompt: the criteria with their ranges, then both documents.
pub fn build_scoring_prompt(resume_text: &str, job_description_text: &str) -> String {
    let criteria: Vec<String> = Criterion::ALL
        .iter()
        .map(|c| {
            format!(
                "- \"{}\": {} ({}-{}).",
                field_name(*c),
                c.description(),
                c.min(),
                c.max()
            )
        })
        .collect();

    format!(
        r#"Score the resume below against the job description.

Think step by step about how the candidate's background matches the role, then
return a JSON object with this EXACT schema:
{{
  "reasoning": "two or three sentences explaining the scores",
{fields}
}}

Criteria and their allowed ranges (every score MUST be a number inside its range):
{criteria}

JOB DESCRIPTION:
{job_description_text}

RESUME:
{resume_text}
"#,
        fields = Criterion::ALL
            .iter()
            .map(|c| format!("  \"{}\": <number>", field_name(*c)))
            .collect::<Vec<_>>()
            .join(",\n"),
        criteria = criteria.join("\n"),
    )
}
