pub mod error;
pub mod evaluate;
pub mod report;
pub mod types;

pub use error::EvaluationError;
pub use evaluate::{evaluate_pronunciation, quick_match_ratio};
pub use report::{build_report, load_cases, CaseInput, CaseReport, Meta, Report};
pub use types::{
    DisplayUnit, EditOp, EvaluationResult, ProblematicPhoneme, ScoringOptions, Token,
};
