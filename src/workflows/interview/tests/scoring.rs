use super::common::*;
use crate::workflows::interview::domain::{Evaluation, QuestionId, QuestionKind};
use crate::workflows::interview::scoring::{aggregate, ReadinessBand};

#[test]
fn weighted_scenario_matches_the_worked_example() {
    // 2 technical questions at weight 2 scoring 80 and 40, 1 behavioral at
    // weight 1 scoring 60: overall = round(300 / 5) = 60.
    let questions = vec![
        question("t1", QuestionKind::Technical, 2.0),
        question("t2", QuestionKind::Technical, 2.0),
        question("b1", QuestionKind::Behavioral, 1.0),
    ];
    let evaluations = vec![
        uniform_evaluation("t1", QuestionKind::Technical, 80),
        uniform_evaluation("t2", QuestionKind::Technical, 40),
        uniform_evaluation("b1", QuestionKind::Behavioral, 60),
    ];

    let summary = aggregate(&questions, &evaluations);

    assert_eq!(summary.overall_score, 60);
    assert_eq!(summary.technical_score, Some(60));
    assert_eq!(summary.behavioral_score, Some(60));
    assert_eq!(summary.readiness_band, ReadinessBand::AlmostReady);
    assert_eq!(summary.per_question.len(), 3);
}

#[test]
fn aggregation_is_deterministic() {
    let questions = vec![
        question("t1", QuestionKind::Technical, 1.5),
        question("b1", QuestionKind::Behavioral, 1.0),
    ];
    let evaluations = vec![
        uniform_evaluation("t1", QuestionKind::Technical, 73),
        uniform_evaluation("b1", QuestionKind::Behavioral, 58),
    ];

    let first = aggregate(&questions, &evaluations);
    let second = aggregate(&questions, &evaluations);

    assert_eq!(first, second);
}

#[test]
fn scaling_all_weights_does_not_change_any_aggregate() {
    let questions = vec![
        question("t1", QuestionKind::Technical, 2.0),
        question("t2", QuestionKind::Technical, 2.0),
        question("b1", QuestionKind::Behavioral, 1.0),
    ];
    let scaled: Vec<_> = questions
        .iter()
        .cloned()
        .map(|mut question| {
            question.weight *= 4.0;
            question
        })
        .collect();
    let evaluations = vec![
        uniform_evaluation("t1", QuestionKind::Technical, 80),
        uniform_evaluation("t2", QuestionKind::Technical, 40),
        uniform_evaluation("b1", QuestionKind::Behavioral, 60),
    ];

    let base = aggregate(&questions, &evaluations);
    let rescaled = aggregate(&scaled, &evaluations);

    assert_eq!(base.overall_score, rescaled.overall_score);
    assert_eq!(base.technical_score, rescaled.technical_score);
    assert_eq!(base.behavioral_score, rescaled.behavioral_score);
}

#[test]
fn missing_evaluations_stay_in_the_denominator_as_zero() {
    let questions = vec![
        question("t1", QuestionKind::Technical, 1.0),
        question("t2", QuestionKind::Technical, 1.0),
    ];
    let evaluations = vec![uniform_evaluation("t1", QuestionKind::Technical, 100)];

    let summary = aggregate(&questions, &evaluations);

    assert_eq!(summary.overall_score, 50);
    let unanswered = &summary.per_question[1];
    assert_eq!(unanswered.question_id, QuestionId("t2".to_string()));
    assert_eq!(unanswered.score, 0);
}

#[test]
fn technical_composite_uses_the_published_weights() {
    let questions = vec![question("t1", QuestionKind::Technical, 1.0)];
    let evaluations = vec![Evaluation {
        technical_accuracy: Some(100),
        relevance_score: 0,
        clarity_score: 0,
        depth_score: 0,
        ..uniform_evaluation("t1", QuestionKind::Technical, 0)
    }];

    let summary = aggregate(&questions, &evaluations);

    // 0.35 * 100, everything else zero.
    assert_eq!(summary.per_question[0].score, 35);
}

#[test]
fn behavioral_composite_uses_the_published_weights() {
    let questions = vec![question("b1", QuestionKind::Behavioral, 1.0)];
    let evaluations = vec![Evaluation {
        relevance_score: 100,
        clarity_score: 0,
        depth_score: 0,
        ..uniform_evaluation("b1", QuestionKind::Behavioral, 0)
    }];

    let summary = aggregate(&questions, &evaluations);

    assert_eq!(summary.per_question[0].score, 40);
}

#[test]
fn readiness_band_boundaries_are_exact() {
    assert_eq!(ReadinessBand::from_overall(80), ReadinessBand::Ready);
    assert_eq!(ReadinessBand::from_overall(79), ReadinessBand::AlmostReady);
    assert_eq!(ReadinessBand::from_overall(60), ReadinessBand::AlmostReady);
    assert_eq!(ReadinessBand::from_overall(59), ReadinessBand::NeedsWork);
    assert_eq!(ReadinessBand::from_overall(100), ReadinessBand::Ready);
    assert_eq!(ReadinessBand::from_overall(0), ReadinessBand::NeedsWork);
}

#[test]
fn kind_specific_scores_are_null_when_the_kind_is_absent() {
    let questions = vec![question("b1", QuestionKind::Behavioral, 1.0)];
    let evaluations = vec![uniform_evaluation("b1", QuestionKind::Behavioral, 70)];

    let summary = aggregate(&questions, &evaluations);

    assert_eq!(summary.technical_score, None);
    assert_eq!(summary.behavioral_score, Some(70));
}

#[test]
fn empty_interview_aggregates_to_zero() {
    let summary = aggregate(&[], &[]);

    assert_eq!(summary.overall_score, 0);
    assert_eq!(summary.technical_score, None);
    assert_eq!(summary.behavioral_score, None);
    assert_eq!(summary.readiness_band, ReadinessBand::NeedsWork);
    assert!(summary.per_question.is_empty());
}

#[test]
fn evaluations_for_unknown_questions_are_ignored() {
    let questions = vec![question("t1", QuestionKind::Technical, 1.0)];
    let evaluations = vec![
        uniform_evaluation("t1", QuestionKind::Technical, 90),
        uniform_evaluation("ghost", QuestionKind::Technical, 10),
    ];

    let summary = aggregate(&questions, &evaluations);

    assert_eq!(summary.per_question.len(), 1);
    assert_eq!(summary.overall_score, 90);
}
