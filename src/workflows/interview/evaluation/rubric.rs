//! Rubric prompt construction and the strict local override policy.
//!
//! Whatever the backend returns, the rules here have the final say: screened
//! non-answers score zero, very short answers are capped, and every numeric
//! field is clamped into range before it reaches the aggregator.

use std::fmt::Write as _;

use serde_json::Value;

use super::screen::AnswerScreen;
use crate::llm::{number_field, string_field, string_list};
use crate::workflows::interview::domain::{Evaluation, JobContext, Question, QuestionKind};

pub(crate) const NO_ANSWER_FEEDBACK: &str = "No answer provided.";
pub(crate) const NON_ANSWER_FEEDBACK: &str =
    "The response does not engage with the question in a professional way.";
pub(crate) const SHORT_ANSWER_FEEDBACK: &str =
    "The answer is too brief to demonstrate real depth on this question.";
pub(crate) const OFFLINE_FEEDBACK: &str =
    "Offline evaluation: scores are estimated from answer length only.";
pub(crate) const UNAVAILABLE_FEEDBACK: &str =
    "This answer could not be evaluated automatically.";

pub(crate) fn build_evaluation_prompt(
    question: &Question,
    transcript: &str,
    context: Option<&JobContext>,
) -> String {
    let mut prompt = String::new();

    writeln!(
        prompt,
        "You are an experienced interviewer scoring a single answer from a mock job interview."
    )
    .expect("write preamble");
    writeln!(
        prompt,
        "Score strictly against the rubric below. Respond with one JSON object and nothing else."
    )
    .expect("write preamble");
    prompt.push('\n');

    if let Some(context) = context {
        writeln!(prompt, "JOB CONTEXT: {}", context.title).expect("write job title");
        if !context.description.trim().is_empty() {
            writeln!(prompt, "{}", context.description.trim()).expect("write job description");
        }
        prompt.push('\n');
    }

    writeln!(prompt, "QUESTION ({}): {}", question.kind.label(), question.text)
        .expect("write question");
    writeln!(prompt, "CANDIDATE ANSWER: {}", transcript).expect("write answer");
    prompt.push('\n');

    writeln!(prompt, "Score each dimension as an integer from 0 to 100:").expect("write rubric");
    writeln!(
        prompt,
        "- relevanceScore: 0-20 off-topic, 21-50 touches the topic but misses the ask, \
         51-80 addresses the main points, 81-100 answers the question directly and completely."
    )
    .expect("write rubric");
    writeln!(
        prompt,
        "- clarityScore: 0-20 incoherent, 21-50 hard to follow, 51-80 mostly clear, \
         81-100 well structured and easy to follow."
    )
    .expect("write rubric");
    writeln!(
        prompt,
        "- depthScore: 0-20 superficial, 21-50 some detail but no reasoning, \
         51-80 solid reasoning or examples, 81-100 expert-level depth with trade-offs."
    )
    .expect("write rubric");
    if question.kind == QuestionKind::Technical {
        writeln!(
            prompt,
            "- technicalAccuracy: 0-20 mostly wrong, 21-50 significant errors, \
             51-80 minor inaccuracies, 81-100 technically correct throughout."
        )
        .expect("write rubric");
    }
    prompt.push('\n');

    writeln!(prompt, "Return exactly this JSON shape:").expect("write shape");
    writeln!(prompt, "{{").expect("write shape");
    writeln!(prompt, "  \"relevanceScore\": <0-100>,").expect("write shape");
    writeln!(prompt, "  \"clarityScore\": <0-100>,").expect("write shape");
    writeln!(prompt, "  \"depthScore\": <0-100>,").expect("write shape");
    if question.kind == QuestionKind::Technical {
        writeln!(prompt, "  \"technicalAccuracy\": <0-100>,").expect("write shape");
    }
    writeln!(prompt, "  \"feedback\": \"<2-3 sentences for the candidate>\",").expect("write shape");
    writeln!(prompt, "  \"detectedIssues\": [\"<specific problem>\", ...],").expect("write shape");
    writeln!(prompt, "  \"strengths\": [\"<specific strength>\", ...],").expect("write shape");
    writeln!(prompt, "  \"keywords\": [\"<notable term used>\", ...],").expect("write shape");
    writeln!(prompt, "  \"confidence\": <0.0-1.0>").expect("write shape");
    writeln!(prompt, "}}").expect("write shape");

    prompt
}

/// Field-by-field view of the backend's evaluation JSON. Every field is
/// optional; shape problems degrade to defaults instead of failing the call.
#[derive(Debug, Default, Clone)]
pub(crate) struct RawEvaluation {
    pub relevance: Option<f64>,
    pub clarity: Option<f64>,
    pub depth: Option<f64>,
    pub technical: Option<f64>,
    pub feedback: Option<String>,
    pub detected_issues: Vec<String>,
    pub strengths: Vec<String>,
    pub keywords: Vec<String>,
    pub confidence: Option<f64>,
}

pub(crate) fn validate_raw(value: &Value) -> RawEvaluation {
    RawEvaluation {
        relevance: number_field(value, "relevanceScore"),
        clarity: number_field(value, "clarityScore"),
        depth: number_field(value, "depthScore"),
        technical: number_field(value, "technicalAccuracy"),
        feedback: string_field(value, "feedback"),
        detected_issues: string_list(value, "detectedIssues"),
        strengths: string_list(value, "strengths"),
        keywords: string_list(value, "keywords"),
        confidence: number_field(value, "confidence"),
    }
}

fn clamp_score(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}

fn clamp_confidence(raw: f64) -> f32 {
    raw.clamp(0.0, 1.0) as f32
}

fn technical_zero(kind: QuestionKind) -> Option<u8> {
    match kind {
        QuestionKind::Technical => Some(0),
        QuestionKind::Behavioral => None,
    }
}

/// Empty or skipped input: fixed zero evaluation, full confidence, no
/// backend call.
pub(crate) fn zero_evaluation(question: &Question) -> Evaluation {
    Evaluation {
        question_id: question.id.clone(),
        relevance_score: 0,
        clarity_score: 0,
        depth_score: 0,
        technical_accuracy: technical_zero(question.kind),
        feedback: NO_ANSWER_FEEDBACK.to_string(),
        detected_issues: Vec::new(),
        strengths: Vec::new(),
        keywords: Vec::new(),
        confidence: 1.0,
    }
}

/// Forced-zero result for screened non-answers and hostile responses.
/// `clarity` carries the backend's clarity score capped at 10, or 0 when
/// there was nothing usable from the backend.
fn degenerate_evaluation(question: &Question, clarity: u8) -> Evaluation {
    Evaluation {
        question_id: question.id.clone(),
        relevance_score: 0,
        clarity_score: clarity.min(10),
        depth_score: 0,
        technical_accuracy: technical_zero(question.kind),
        feedback: NON_ANSWER_FEEDBACK.to_string(),
        detected_issues: vec!["Answer does not address the question".to_string()],
        strengths: Vec::new(),
        keywords: Vec::new(),
        confidence: 0.9,
    }
}

/// Offline mode: a deterministic score from word count alone, uniform across
/// all dimensions. The screening override still applies.
pub(crate) fn offline_evaluation(question: &Question, screen: AnswerScreen) -> Evaluation {
    if screen.degenerate() {
        return degenerate_evaluation(question, 0);
    }

    let score = clamp_score(screen.word_count as f64 / 6.0 + 30.0);
    Evaluation {
        question_id: question.id.clone(),
        relevance_score: score,
        clarity_score: score,
        depth_score: score,
        technical_accuracy: match question.kind {
            QuestionKind::Technical => Some(score),
            QuestionKind::Behavioral => None,
        },
        feedback: OFFLINE_FEEDBACK.to_string(),
        detected_issues: Vec::new(),
        strengths: Vec::new(),
        keywords: Vec::new(),
        confidence: 0.5,
    }
}

/// Backend unreachable or its response unusable: a clearly marked low
/// confidence fallback. Screened degenerate answers still score zero.
pub(crate) fn fallback_evaluation(question: &Question, screen: AnswerScreen) -> Evaluation {
    if screen.degenerate() {
        return degenerate_evaluation(question, 0);
    }

    Evaluation {
        question_id: question.id.clone(),
        relevance_score: 0,
        clarity_score: 0,
        depth_score: 0,
        technical_accuracy: technical_zero(question.kind),
        feedback: UNAVAILABLE_FEEDBACK.to_string(),
        detected_issues: Vec::new(),
        strengths: Vec::new(),
        keywords: Vec::new(),
        confidence: 0.3,
    }
}

/// Combines the backend's parsed scores with the local screen verdict.
pub(crate) fn apply_rubric(
    question: &Question,
    screen: AnswerScreen,
    raw: RawEvaluation,
) -> Evaluation {
    if screen.degenerate() {
        let clarity = raw.clarity.map(clamp_score).unwrap_or(0);
        return degenerate_evaluation(question, clarity);
    }

    let mut relevance = clamp_score(raw.relevance.unwrap_or(0.0));
    let clarity = clamp_score(raw.clarity.unwrap_or(0.0));
    let mut depth = clamp_score(raw.depth.unwrap_or(0.0));
    let mut technical = match question.kind {
        QuestionKind::Technical => Some(clamp_score(raw.technical.unwrap_or(0.0))),
        QuestionKind::Behavioral => None,
    };

    if screen.word_count < 8 {
        relevance = relevance.min(40);
        depth = depth.min(35);
        if let Some(accuracy) = technical.as_mut() {
            *accuracy = (*accuracy).min(50);
        }

        let feedback = raw
            .feedback
            .unwrap_or_else(|| SHORT_ANSWER_FEEDBACK.to_string());
        let detected_issues = if raw.detected_issues.is_empty() {
            vec!["Answer is very short".to_string()]
        } else {
            raw.detected_issues
        };

        return Evaluation {
            question_id: question.id.clone(),
            relevance_score: relevance,
            clarity_score: clarity,
            depth_score: depth,
            technical_accuracy: technical,
            feedback,
            detected_issues,
            strengths: raw.strengths,
            keywords: raw.keywords,
            confidence: clamp_confidence(raw.confidence.unwrap_or(0.6)),
        };
    }

    Evaluation {
        question_id: question.id.clone(),
        relevance_score: relevance,
        clarity_score: clarity,
        depth_score: depth,
        technical_accuracy: technical,
        feedback: raw.feedback.unwrap_or_default(),
        detected_issues: raw.detected_issues,
        strengths: raw.strengths,
        keywords: raw.keywords,
        confidence: clamp_confidence(raw.confidence.unwrap_or(0.5)),
    }
}
