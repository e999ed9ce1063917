use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::evaluate::{evaluate_pronunciation, quick_match_ratio};
use crate::types::{EvaluationResult, ScoringOptions};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// One evaluation case as stored in a JSON cases file. Probability arrays are
/// indexed by non-space phoneme position.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseInput {
    pub id: String,
    pub reference: String,
    pub reference_probs: Vec<f64>,
    pub user: String,
    pub user_probs: Vec<f64>,
}

impl CaseInput {
    /// Serving-boundary validation: the engine itself tolerates any shape,
    /// but case files with non-finite or negative confidences are rejected
    /// before evaluation.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let probs = self
            .reference_probs
            .iter()
            .chain(self.user_probs.iter());
        for &prob in probs {
            if !prob.is_finite() || prob < 0.0 {
                return Err(EvaluationError::invalid_input(format!(
                    "case '{}' has invalid confidence value: {prob}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub cases: Vec<CaseReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub case_count: usize,
    pub problem_ratio: f64,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    /// Cheap pre-check ratio, reported alongside the full alignment so
    /// consumers can triage without re-running the matcher.
    pub quick_match_ratio: f64,
    pub result: EvaluationResult,
}

/// Load and validate a JSON array of evaluation cases.
pub fn load_cases(path: &Path) -> Result<Vec<CaseInput>, EvaluationError> {
    let data =
        std::fs::read_to_string(path).map_err(|e| EvaluationError::io("read cases file", e))?;
    let cases: Vec<CaseInput> =
        serde_json::from_str(&data).map_err(|e| EvaluationError::json("parse cases file", e))?;
    for case in &cases {
        case.validate()?;
    }
    Ok(cases)
}

/// Evaluate every case and assemble the serializable report.
pub fn build_report(cases: &[CaseInput], options: &ScoringOptions) -> Report {
    let case_reports = cases
        .iter()
        .map(|case| CaseReport {
            id: case.id.clone(),
            quick_match_ratio: quick_match_ratio(&case.reference, &case.user),
            result: evaluate_pronunciation(
                &case.reference,
                &case.reference_probs,
                &case.user,
                &case.user_probs,
                options,
            ),
        })
        .collect::<Vec<_>>();

    Report {
        schema_version: REPORT_SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            case_count: case_reports.len(),
            problem_ratio: options.problem_ratio,
            top_n: options.top_n,
        },
        cases: case_reports,
    }
}
