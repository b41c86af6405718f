//! Score validation: turns raw oracle output into trusted sub-scores.
//!
//! Out-of-range values are rejected, never clamped.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::fitment::criteria::Criterion;
use crate::fitment::oracle::RawScoreOutput;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreRangeError {
    #[error("{criterion} score is not a number (got {value})")]
    NotNumeric { criterion: Criterion, value: String },

    #[error("{criterion} score is not a finite number (got {value})")]
    NotFinite { criterion: Criterion, value: f64 },

    #[error("{criterion} score {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        criterion: Criterion,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Six in-range sub-scores plus their exact sum.
///
/// Serialized with the public field names of the scoring endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidatedScores {
    #[serde(rename = "technical_skills")]
    pub skill: f64,
    pub experience: f64,
    #[serde(rename = "achievements")]
    pub achievement: f64,
    pub communication: f64,
    pub education: f64,
    pub overall_fit: f64,
    #[serde(rename = "total_score")]
    pub total: f64,
}

impl ValidatedScores {
    #[cfg(test)]
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Skill => self.skill,
            Criterion::Experience => self.experience,
            Criterion::Achievement => self.achievement,
            Criterion::Communication => self.communication,
            Criterion::Education => self.education,
            Criterion::OverallFit => self.overall_fit,
        }
    }
}

/// Checks each of the six raw values and recomputes the total.
///
/// Any value the oracle reported as a total is ignored.
pub fn validate(raw: &RawScoreOutput) -> Result<ValidatedScores, ScoreRangeError> {
    let mut values = [0.0_f64; 6];
    for (slot, criterion) in values.iter_mut().zip(Criterion::ALL) {
        *slot = checked_score(criterion, raw.get(criterion))?;
    }

    let [skill, experience, achievement, communication, education, overall_fit] = values;
    Ok(ValidatedScores {
        skill,
        experience,
        achievement,
        communication,
        education,
        overall_fit,
        total: values.iter().sum(),
    })
}

fn checked_score(criterion: Criterion, raw: &Value) -> Result<f64, ScoreRangeError> {
    let value = numeric_value(raw).ok_or_else(|| ScoreRangeError::NotNumeric {
        criterion,
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ScoreRangeError::NotFinite { criterion, value });
    }

    if !criterion.contains(value) {
        return Err(ScoreRangeError::OutOfRange {
            criterion,
            value,
            min: criterion.min(),
            max: criterion.max(),
        });
    }

    Ok(value)
}

/// JSON numbers are taken as-is; models sometimes quote numbers, so a string
/// holding exactly one number is accepted too.
fn numeric_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
