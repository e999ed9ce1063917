use std::cmp::Ordering;

use crate::evaluate::matcher::{OpTag, Opcode};
use crate::evaluate::tokenize::SpaceStripped;
use crate::types::{
    DisplayUnit, EditOp, EvaluationResult, ProblematicPhoneme, ScoringOptions, Token,
};

/// Walk the edit-script, re-attach whitespace at original reference
/// positions, and compute the aggregate pronunciation scores.
///
/// Probability arrays index the non-space projections; a position outside the
/// array is treated as an absent confidence, never as a failure.
pub(crate) fn score(
    ref_tokens: &[Token],
    ref_stripped: &SpaceStripped,
    ref_probs: &[f64],
    user_stripped: &SpaceStripped,
    user_probs: &[f64],
    ops: &[Opcode],
    options: &ScoringOptions,
) -> EvaluationResult {
    let mut records: Vec<EditOp> = Vec::with_capacity(ref_stripped.len() + user_stripped.len());
    let mut problematic: Vec<ProblematicPhoneme> = Vec::new();
    let mut matching_phonemes = 0usize;
    let mut total_score = 0.0f64;

    for op in ops {
        match op.tag {
            OpTag::Equal => {
                for offset in 0..op.i2 - op.i1 {
                    let i = op.i1 + offset;
                    let j = op.j1 + offset;
                    let ref_prob = ref_probs.get(i).copied();
                    let user_prob = user_probs.get(j).copied();

                    matching_phonemes += 1;
                    if let (Some(r), Some(u)) = (ref_prob, user_prob) {
                        total_score += (r + u) / 2.0;
                        if u < r * options.problem_ratio {
                            problematic.push(ProblematicPhoneme {
                                phoneme: user_stripped.symbols[j].clone(),
                                ref_prob: r,
                                user_prob: u,
                                prob_diff: r - u,
                            });
                        }
                    }

                    records.push(EditOp::Match {
                        ref_phoneme: ref_stripped.symbols[i].clone(),
                        user_phoneme: user_stripped.symbols[j].clone(),
                        ref_prob,
                        user_prob,
                        index: ref_stripped.index_map[i],
                    });
                }
            }
            OpTag::Replace => {
                // Ranges may differ in length; pairing is positional up to the
                // shorter side and the remainder is dropped (see DESIGN.md).
                let ref_len = op.i2 - op.i1;
                let user_len = op.j2 - op.j1;
                if ref_len != user_len {
                    tracing::debug!(
                        ref_len,
                        user_len,
                        "replace ranges differ in length, truncating to the shorter side"
                    );
                }
                for offset in 0..ref_len.min(user_len) {
                    let i = op.i1 + offset;
                    let j = op.j1 + offset;
                    records.push(EditOp::Substitution {
                        ref_phoneme: ref_stripped.symbols[i].clone(),
                        user_phoneme: user_stripped.symbols[j].clone(),
                        ref_prob: ref_probs.get(i).copied(),
                        user_prob: user_probs.get(j).copied(),
                        index: ref_stripped.index_map[i],
                    });
                }
            }
            OpTag::Delete => {
                for i in op.i1..op.i2 {
                    records.push(EditOp::Deletion {
                        ref_phoneme: ref_stripped.symbols[i].clone(),
                        ref_prob: ref_probs.get(i).copied(),
                        index: ref_stripped.index_map[i],
                    });
                }
            }
            OpTag::Insert => {
                for j in op.j1..op.j2 {
                    records.push(EditOp::Insertion {
                        user_phoneme: user_stripped.symbols[j].clone(),
                        user_prob: user_probs.get(j).copied(),
                    });
                }
            }
        }
    }

    let total_ref_phonemes = ref_stripped.len();
    let phoneme_accuracy = if total_ref_phonemes > 0 {
        matching_phonemes as f64 / total_ref_phonemes as f64
    } else {
        0.0
    };
    let average_probability = if matching_phonemes > 0 {
        total_score / matching_phonemes as f64
    } else {
        0.0
    };

    // Stable descending sort keeps first-encountered order for equal gaps.
    problematic.sort_by(|a, b| {
        b.prob_diff
            .partial_cmp(&a.prob_diff)
            .unwrap_or(Ordering::Equal)
    });
    if let Some(top_n) = options.top_n {
        problematic.truncate(top_n);
    }

    EvaluationResult {
        phoneme_accuracy,
        average_probability,
        final_score: phoneme_accuracy * average_probability,
        differences: interleave_spaces(ref_tokens, records),
        problematic_phonemes: problematic,
    }
}

/// Rebuild the reference layout: one Space unit per original whitespace
/// token, one edit record per non-space token. Insertions consume no
/// reference position; they are emitted in stream order and any left after
/// the reference is exhausted are appended at the end.
fn interleave_spaces(ref_tokens: &[Token], records: Vec<EditOp>) -> Vec<DisplayUnit> {
    let mut units = Vec::with_capacity(ref_tokens.len() + records.len());
    let mut pending = records.into_iter().peekable();

    for token in ref_tokens {
        if token.is_space {
            units.push(DisplayUnit::Space(token.text.clone()));
            continue;
        }
        while let Some(insertion) = pending.next_if(|record| !record.consumes_reference()) {
            units.push(DisplayUnit::Op(insertion));
        }
        match pending.next() {
            Some(record) => units.push(DisplayUnit::Op(record)),
            None => {
                // Records exhausted before the reference sequence; never
                // fabricate units.
                tracing::debug!(
                    index = token.index,
                    "edit records exhausted before reference tokens"
                );
                break;
            }
        }
    }
    units.extend(pending.map(DisplayUnit::Op));
    units
}
