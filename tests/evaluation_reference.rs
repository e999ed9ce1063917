use phonometrics_rs::{
    build_report, evaluate_pronunciation, quick_match_ratio, CaseInput, DisplayUnit, EditOp,
    EvaluationResult, ScoringOptions,
};

fn ref_side_text(result: &EvaluationResult) -> String {
    result
        .differences
        .iter()
        .map(|unit| match unit {
            DisplayUnit::Space(value) => value.as_str(),
            DisplayUnit::Op(op) => op.ref_text(),
        })
        .collect()
}

fn unit_types(result: &EvaluationResult) -> Vec<String> {
    result
        .differences
        .iter()
        .map(|unit| {
            serde_json::to_value(unit).expect("serializable")["type"]
                .as_str()
                .expect("type tag")
                .to_string()
        })
        .collect()
}

#[test]
fn ipa_sentence_aligns_and_scores() {
    let reference = "ɛl va o kɔ̃sɛʁ";
    let user = "ɛl vø o kosɛʁ";
    let ref_probs = [0.95, 0.9, 0.99, 0.85];
    let user_probs = [0.9, 0.5, 0.97, 0.6];

    let result = evaluate_pronunciation(
        reference,
        &ref_probs,
        user,
        &user_probs,
        &ScoringOptions::default(),
    );

    assert_eq!(result.phoneme_accuracy, 0.5);
    assert!((result.average_probability - 0.9525).abs() < 1e-12);
    assert!((result.final_score - 0.47625).abs() < 1e-12);
    assert_eq!(
        unit_types(&result),
        [
            "match",
            "space",
            "substitution",
            "space",
            "match",
            "space",
            "substitution"
        ]
    );
    // Both matched phonemes stay above the problematic threshold.
    assert!(result.problematic_phonemes.is_empty());

    assert_eq!(quick_match_ratio(reference, user), 0.5);
}

#[test]
fn identity_alignment_over_full_sentence() {
    let reference = "ɛl vøt alɛt o kɔ̃sɛʁ mɛz ɛl na pa də bijɛ";
    let probs = vec![0.9; 11];

    let result =
        evaluate_pronunciation(reference, &probs, reference, &probs, &ScoringOptions::default());

    assert_eq!(result.phoneme_accuracy, 1.0);
    assert!((result.average_probability - 0.9).abs() < 1e-12);
    assert!((result.final_score - result.average_probability).abs() < 1e-12);
    assert!(!result
        .differences
        .iter()
        .any(|unit| matches!(
            unit,
            DisplayUnit::Op(
                EditOp::Substitution { .. } | EditOp::Deletion { .. } | EditOp::Insertion { .. }
            )
        )));
    assert_eq!(quick_match_ratio(reference, reference), 1.0);
}

#[test]
fn display_units_reconstruct_the_reference_layout() {
    let cases = [
        ("ɛl va o kɔ̃sɛʁ", "ɛl vø o kosɛʁ"),
        ("a  b\tc", "a c"),
        (" a b ", "x y z"),
        ("a", "a b c"),
        ("", "a"),
    ];
    for (reference, user) in cases {
        let result = evaluate_pronunciation(
            reference,
            &[0.9; 8],
            user,
            &[0.9; 8],
            &ScoringOptions::default(),
        );
        assert_eq!(ref_side_text(&result), reference, "reference: {reference:?}");
    }
}

#[test]
fn insertion_keeps_reference_accuracy_and_null_index() {
    let result =
        evaluate_pronunciation("a", &[0.9], "a b", &[0.9, 0.5], &ScoringOptions::default());
    assert_eq!(result.phoneme_accuracy, 1.0);

    let insertion = serde_json::to_value(&result.differences[1]).expect("serializable");
    assert_eq!(insertion["type"], "insertion");
    assert_eq!(insertion["user_phoneme"], "b");
    assert!(insertion.get("index").is_none());
}

#[test]
fn problematic_phonemes_surface_worst_first() {
    let reference = "pa də bijɛ";
    let user = "pa də bijɛ";
    let ref_probs = [0.9, 0.95, 0.99];
    let user_probs = [0.4, 0.9, 0.6];

    let result = evaluate_pronunciation(
        reference,
        &ref_probs,
        user,
        &user_probs,
        &ScoringOptions::default(),
    );

    // Gaps: pa 0.5, bijɛ 0.39; də (0.9 vs 0.95) is above the 0.8 cutoff.
    let phonemes: Vec<&str> = result
        .problematic_phonemes
        .iter()
        .map(|p| p.phoneme.as_str())
        .collect();
    assert_eq!(phonemes, ["pa", "bijɛ"]);
    assert!((result.problematic_phonemes[0].prob_diff - 0.5).abs() < 1e-12);
    assert!(
        result.problematic_phonemes[0].prob_diff > result.problematic_phonemes[1].prob_diff
    );
}

#[test]
fn batch_report_covers_every_case() {
    let cases: Vec<CaseInput> = serde_json::from_str(
        r#"[
            {"id": "good", "reference": "ɛl va", "reference_probs": [0.9, 0.9],
             "user": "ɛl va", "user_probs": [0.9, 0.9]},
            {"id": "poor", "reference": "ɛl va", "reference_probs": [0.9, 0.9],
             "user": "øl vø", "user_probs": [0.4, 0.5]}
        ]"#,
    )
    .expect("valid cases json");

    let report = build_report(&cases, &ScoringOptions::default());
    assert_eq!(report.meta.case_count, 2);
    assert_eq!(report.cases[0].quick_match_ratio, 1.0);
    assert_eq!(report.cases[0].result.final_score, 0.9);
    assert_eq!(report.cases[1].quick_match_ratio, 0.0);
    assert_eq!(report.cases[1].result.final_score, 0.0);
}
