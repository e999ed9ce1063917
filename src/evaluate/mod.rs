pub mod matcher;
pub(crate) mod score;
pub mod tokenize;

use crate::types::{EvaluationResult, ScoringOptions};

/// Align a learner transcription against a reference transcription and score
/// the pronunciation quality.
///
/// Probability arrays are indexed by non-space phoneme position (`i`-th value
/// for the `i`-th non-space token). The engine is total over its inputs:
/// short probability arrays, empty strings and mismatched lengths all degrade
/// to absent confidences or zero scores, never to an error.
pub fn evaluate_pronunciation(
    reference: &str,
    reference_probs: &[f64],
    user: &str,
    user_probs: &[f64],
    options: &ScoringOptions,
) -> EvaluationResult {
    let ref_tokens = tokenize::tokenize(reference);
    let user_tokens = tokenize::tokenize(user);
    let ref_stripped = tokenize::strip_spaces(&ref_tokens);
    let user_stripped = tokenize::strip_spaces(&user_tokens);

    let blocks = matcher::matching_blocks(&ref_stripped.symbols, &user_stripped.symbols);
    let ops = matcher::opcodes(&blocks);

    score::score(
        &ref_tokens,
        &ref_stripped,
        reference_probs,
        &user_stripped,
        user_probs,
        &ops,
        options,
    )
}

/// Cheap overall similarity ratio in `[0, 1]` between the two space-stripped
/// transcriptions, for triage before a full scored alignment. Two empty
/// projections are identical and yield `1.0`.
pub fn quick_match_ratio(reference: &str, user: &str) -> f64 {
    let ref_stripped = tokenize::strip_spaces(&tokenize::tokenize(reference));
    let user_stripped = tokenize::strip_spaces(&tokenize::tokenize(user));
    matcher::block_match_ratio(&ref_stripped.symbols, &user_stripped.symbols)
}
