use super::common::*;
use crate::workflows::interview::domain::QuestionKind;
use crate::workflows::interview::evaluation::{
    AnswerEvaluator, EvaluatorOptions, NO_ANSWER_FEEDBACK, UNAVAILABLE_FEEDBACK,
};
use serde_json::json;

fn online_evaluator(model: std::sync::Arc<ScriptedModel>) -> AnswerEvaluator {
    AnswerEvaluator::new(model, EvaluatorOptions::default())
}

fn evaluation_json(relevance: u8, clarity: u8, depth: u8, accuracy: Option<u8>) -> String {
    let mut value = json!({
        "relevanceScore": relevance,
        "clarityScore": clarity,
        "depthScore": depth,
        "feedback": "Solid answer with concrete detail.",
        "detectedIssues": ["No discussion of trade-offs"],
        "strengths": ["Specific metrics"],
        "keywords": ["caching"],
        "confidence": 0.85,
    });
    if let Some(accuracy) = accuracy {
        value["technicalAccuracy"] = json!(accuracy);
    }
    value.to_string()
}

const SUBSTANTIVE_ANSWER: &str = "I implemented a caching layer using LRU eviction with a \
                                  2-minute TTL to reduce database load by 40%.";

#[tokio::test]
async fn empty_answer_scores_zero_without_calling_the_backend() {
    let model = ScriptedModel::replying(&evaluation_json(90, 90, 90, Some(90)));
    let evaluator = online_evaluator(model.clone());
    let question = question("q1", QuestionKind::Technical, 1.0);

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", "   ")), None)
        .await;

    assert_eq!(model.call_count(), 0, "empty input must never reach the backend");
    assert_eq!(evaluation.relevance_score, 0);
    assert_eq!(evaluation.clarity_score, 0);
    assert_eq!(evaluation.depth_score, 0);
    assert_eq!(evaluation.technical_accuracy, Some(0));
    assert_eq!(evaluation.feedback, NO_ANSWER_FEEDBACK);
    assert_eq!(evaluation.confidence, 1.0);
}

#[tokio::test]
async fn skipped_and_sentinel_answers_score_zero() {
    let model = ScriptedModel::replying(&evaluation_json(90, 90, 90, None));
    let evaluator = online_evaluator(model.clone());
    let question = question("q1", QuestionKind::Behavioral, 1.0);

    let skipped = evaluator
        .evaluate(&question, Some(&skipped_answer("q1")), None)
        .await;
    let sentinel = evaluator
        .evaluate(&question, Some(&answer("q1", "[skipped]")), None)
        .await;
    let missing = evaluator.evaluate(&question, None, None).await;

    assert_eq!(model.call_count(), 0);
    for evaluation in [skipped, sentinel, missing] {
        assert_eq!(evaluation.relevance_score, 0);
        assert_eq!(evaluation.technical_accuracy, None, "behavioral stays null");
        assert_eq!(evaluation.confidence, 1.0);
    }
}

#[tokio::test]
async fn non_answers_are_forced_to_zero_despite_generous_backend_scores() {
    for transcript in ["idk", "n/a", "ok"] {
        let model = ScriptedModel::replying(&evaluation_json(95, 88, 92, Some(97)));
        let evaluator = online_evaluator(model.clone());
        let question = question("q1", QuestionKind::Technical, 1.0);

        let evaluation = evaluator
            .evaluate(&question, Some(&answer("q1", transcript)), None)
            .await;

        assert_eq!(evaluation.relevance_score, 0, "'{transcript}' must score 0");
        assert_eq!(evaluation.depth_score, 0);
        assert!(evaluation.clarity_score <= 10, "clarity capped at 10");
        assert_eq!(evaluation.technical_accuracy, Some(0));
        assert_eq!(evaluation.confidence, 0.9);
    }
}

#[tokio::test]
async fn hostile_answers_are_forced_to_zero() {
    let model = ScriptedModel::replying(&evaluation_json(80, 80, 80, None));
    let evaluator = online_evaluator(model);
    let question = question("q1", QuestionKind::Behavioral, 1.0);

    let evaluation = evaluator
        .evaluate(
            &question,
            Some(&answer("q1", "honestly this is a stupid question and a waste of time")),
            None,
        )
        .await;

    assert_eq!(evaluation.relevance_score, 0);
    assert_eq!(evaluation.depth_score, 0);
    assert_eq!(evaluation.confidence, 0.9);
}

#[tokio::test]
async fn short_answers_are_capped_but_keep_backend_feedback() {
    let model = ScriptedModel::replying(&evaluation_json(90, 85, 90, Some(95)));
    let evaluator = online_evaluator(model);
    let question = question("q1", QuestionKind::Technical, 1.0);

    // Seven words: past the non-answer screen, under the short-answer bar.
    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", "We used Redis for caching user sessions")), None)
        .await;

    assert_eq!(evaluation.relevance_score, 40);
    assert_eq!(evaluation.depth_score, 35);
    assert_eq!(evaluation.technical_accuracy, Some(50));
    assert_eq!(evaluation.clarity_score, 85, "clarity is clamped, not capped");
    assert_eq!(evaluation.feedback, "Solid answer with concrete detail.");
}

#[tokio::test]
async fn substantive_answers_pass_through_with_clamping_only() {
    let raw = json!({
        "relevanceScore": 120,
        "clarityScore": -5,
        "depthScore": 77,
        "technicalAccuracy": 88,
        "feedback": "Good use of concrete numbers.",
        "detectedIssues": ["Missing failure-mode discussion", 42],
        "strengths": ["Quantified impact"],
        "keywords": ["LRU", "TTL"],
        "confidence": 1.7,
    })
    .to_string();
    let model = ScriptedModel::replying(&raw);
    let evaluator = online_evaluator(model);
    let question = question("q1", QuestionKind::Technical, 1.0);

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", SUBSTANTIVE_ANSWER)), None)
        .await;

    assert_eq!(evaluation.relevance_score, 100, "clamped into range");
    assert_eq!(evaluation.clarity_score, 0);
    assert_eq!(evaluation.depth_score, 77);
    assert_eq!(evaluation.technical_accuracy, Some(88));
    assert_eq!(evaluation.confidence, 1.0);
    assert_eq!(evaluation.detected_issues, vec!["Missing failure-mode discussion"]);
    assert_eq!(evaluation.feedback, "Good use of concrete numbers.");
}

#[tokio::test]
async fn behavioral_questions_never_carry_technical_accuracy() {
    let model = ScriptedModel::replying(&evaluation_json(70, 70, 70, Some(99)));
    let evaluator = online_evaluator(model);
    let question = question("q1", QuestionKind::Behavioral, 1.0);

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", SUBSTANTIVE_ANSWER)), None)
        .await;

    assert_eq!(evaluation.technical_accuracy, None);
}

#[tokio::test]
async fn fenced_json_responses_are_extracted() {
    let raw = format!(
        "Here is my evaluation:\n```json\n{}\n```",
        evaluation_json(75, 70, 65, Some(80))
    );
    let model = ScriptedModel::replying(&raw);
    let evaluator = online_evaluator(model);
    let question = question("q1", QuestionKind::Technical, 1.0);

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", SUBSTANTIVE_ANSWER)), None)
        .await;

    assert_eq!(evaluation.relevance_score, 75);
    assert_eq!(evaluation.technical_accuracy, Some(80));
}

#[tokio::test]
async fn unparsable_responses_degrade_to_a_low_confidence_fallback() {
    let model = ScriptedModel::replying("I would rate this answer quite highly overall.");
    let evaluator = online_evaluator(model);
    let question = question("q1", QuestionKind::Technical, 1.0);

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", SUBSTANTIVE_ANSWER)), None)
        .await;

    assert_eq!(evaluation.feedback, UNAVAILABLE_FEEDBACK);
    assert!(evaluation.confidence <= 0.5);
    assert_eq!(evaluation.technical_accuracy, Some(0));
}

#[tokio::test]
async fn one_failing_call_never_aborts_the_batch() {
    let model = ScriptedModel::new(vec![
        ScriptStep::Fail,
        ScriptStep::Reply(evaluation_json(80, 80, 80, None)),
    ]);
    let evaluator = online_evaluator(model.clone());
    let interview = interview(
        vec![
            question("q1", QuestionKind::Technical, 1.0),
            question("q2", QuestionKind::Behavioral, 1.0),
        ],
        vec![answer("q1", SUBSTANTIVE_ANSWER), answer("q2", SUBSTANTIVE_ANSWER)],
    );

    let evaluations = evaluator.evaluate_all(&interview, None).await;

    assert_eq!(evaluations.len(), 2, "one entry per question, order preserved");
    assert_eq!(evaluations[0].question_id.as_str(), "q1");
    assert_eq!(evaluations[0].feedback, UNAVAILABLE_FEEDBACK);
    assert_eq!(evaluations[1].question_id.as_str(), "q2");
    assert_eq!(evaluations[1].relevance_score, 80);
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn offline_mode_scores_from_word_count_alone() {
    let evaluator = AnswerEvaluator::offline();
    let question = question("q1", QuestionKind::Technical, 1.0);
    // 17 words: round(17/6 + 30) = 33.
    let transcript = "I designed the service to shard by customer id which kept every \
                      query local to one partition";

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", transcript)), None)
        .await;

    assert_eq!(evaluation.relevance_score, 33);
    assert_eq!(evaluation.clarity_score, 33);
    assert_eq!(evaluation.depth_score, 33);
    assert_eq!(evaluation.technical_accuracy, Some(33));
    assert_eq!(evaluation.confidence, 0.5);
}

#[tokio::test]
async fn offline_mode_still_zeroes_non_answers() {
    let evaluator = AnswerEvaluator::offline();
    let question = question("q1", QuestionKind::Behavioral, 1.0);

    let evaluation = evaluator
        .evaluate(&question, Some(&answer("q1", "idk")), None)
        .await;

    assert_eq!(evaluation.relevance_score, 0);
    assert_eq!(evaluation.depth_score, 0);
    assert_eq!(evaluation.confidence, 0.9);
}

#[tokio::test]
async fn job_context_is_embedded_in_the_prompt() {
    let model = ScriptedModel::replying(&evaluation_json(70, 70, 70, None));
    let evaluator = online_evaluator(model.clone());
    let question = question("q1", QuestionKind::Behavioral, 1.0);
    let context = crate::workflows::interview::domain::JobContext {
        title: "Backend Engineer".to_string(),
        description: "Rust services at scale".to_string(),
    };

    evaluator
        .evaluate(&question, Some(&answer("q1", SUBSTANTIVE_ANSWER)), Some(&context))
        .await;

    let prompts = model.prompts();
    assert!(prompts[0].contains("Backend Engineer"));
    assert!(prompts[0].contains("Rust services at scale"));
}
