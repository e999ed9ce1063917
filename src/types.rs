use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One unit of a tokenized phoneme string: either a single whitespace
/// character or a maximal run of non-whitespace characters. Immutable once
/// produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Position in the original token sequence.
    pub index: usize,
    pub is_space: bool,
}

/// Per-call scoring knobs. These are explicit parameters rather than module
/// constants so the engine stays reentrant and configurable per invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringOptions {
    /// A matched phoneme is flagged problematic when both confidences are
    /// present and `user_prob < ref_prob * problem_ratio`.
    pub problem_ratio: f64,
    /// Keep only the worst `top_n` problematic phonemes; `None` keeps all.
    pub top_n: Option<usize>,
}

impl ScoringOptions {
    pub const DEFAULT_PROBLEM_RATIO: f64 = 0.8;
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            problem_ratio: Self::DEFAULT_PROBLEM_RATIO,
            top_n: None,
        }
    }
}

/// Closed set of per-phoneme alignment outcomes. A missing confidence means
/// the probability array did not cover the phoneme's position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditOp {
    Match {
        ref_phoneme: String,
        user_phoneme: String,
        ref_prob: Option<f64>,
        user_prob: Option<f64>,
        /// Index of the reference phoneme in the original token sequence.
        index: usize,
    },
    Substitution {
        ref_phoneme: String,
        user_phoneme: String,
        ref_prob: Option<f64>,
        user_prob: Option<f64>,
        index: usize,
    },
    Deletion {
        ref_phoneme: String,
        ref_prob: Option<f64>,
        index: usize,
    },
    Insertion {
        user_phoneme: String,
        user_prob: Option<f64>,
    },
}

impl EditOp {
    /// Match/Substitution/Deletion each cover exactly one reference phoneme;
    /// Insertion covers none.
    pub fn consumes_reference(&self) -> bool {
        !matches!(self, Self::Insertion { .. })
    }

    /// Reference-side text contributed to the whitespace round-trip
    /// (empty for Insertion).
    pub fn ref_text(&self) -> &str {
        match self {
            Self::Match { ref_phoneme, .. }
            | Self::Substitution { ref_phoneme, .. }
            | Self::Deletion { ref_phoneme, .. } => ref_phoneme,
            Self::Insertion { .. } => "",
        }
    }
}

/// Whitespace-aware rendering unit; the ordered sequence of display units
/// reconstructs the reference string's original layout.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUnit {
    /// Carries the original whitespace character (space, tab, newline) so the
    /// layout round-trips exactly.
    Space(String),
    Op(EditOp),
}

impl Serialize for DisplayUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Space(value) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "space")?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Op(op) => op.serialize(serializer),
        }
    }
}

/// A correctly matched phoneme whose user-side confidence dropped materially
/// below the reference-side confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblematicPhoneme {
    pub phoneme: String,
    pub ref_prob: f64,
    pub user_prob: f64,
    pub prob_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// Fraction of reference phonemes covered by a Match; 0 when the
    /// reference has no phonemes.
    pub phoneme_accuracy: f64,
    /// Mean of the averaged ref/user confidence over all Matches; 0 when
    /// there are no matches.
    pub average_probability: f64,
    /// `phoneme_accuracy * average_probability`.
    pub final_score: f64,
    pub differences: Vec<DisplayUnit>,
    /// Sorted by descending `prob_diff`, stable for equal gaps.
    pub problematic_phonemes: Vec<ProblematicPhoneme>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_unit_serializes_with_type_tag() {
        let unit = DisplayUnit::Space("\t".to_string());
        let value = serde_json::to_value(&unit).expect("serializable");
        assert_eq!(value["type"], "space");
        assert_eq!(value["value"], "\t");
    }

    #[test]
    fn edit_op_serializes_with_lowercase_tags() {
        let op = DisplayUnit::Op(EditOp::Substitution {
            ref_phoneme: "b".to_string(),
            user_phoneme: "c".to_string(),
            ref_prob: Some(0.9),
            user_prob: Some(0.4),
            index: 2,
        });
        let value = serde_json::to_value(&op).expect("serializable");
        assert_eq!(value["type"], "substitution");
        assert_eq!(value["ref_phoneme"], "b");
        assert_eq!(value["user_phoneme"], "c");
        assert_eq!(value["index"], 2);
    }

    #[test]
    fn insertion_has_no_reference_fields() {
        let op = DisplayUnit::Op(EditOp::Insertion {
            user_phoneme: "b".to_string(),
            user_prob: Some(0.5),
        });
        let value = serde_json::to_value(&op).expect("serializable");
        assert_eq!(value["type"], "insertion");
        assert!(value.get("ref_phoneme").is_none());
        assert!(value.get("index").is_none());
    }

    #[test]
    fn default_options() {
        let options = ScoringOptions::default();
        assert_eq!(options.problem_ratio, 0.8);
        assert!(options.top_n.is_none());
    }
}
