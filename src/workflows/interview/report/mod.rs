//! Readiness report generation.
//!
//! Numeric scores and the readiness band are computed first by the
//! aggregator and are final; the narrative backend only contributes prose,
//! and every path (offline, malformed response, backend down) still
//! produces a complete report.

mod backfill;
mod views;

pub use views::{Blocker, BlockerSeverity, Report};

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::llm::{
    extract_json_object, number_field, string_field, string_list, CompletionOptions,
    TextGeneration,
};
use crate::workflows::interview::domain::{
    Evaluation, Interview, JobContext, Question, QuestionId, QuestionKind,
};
use crate::workflows::interview::metrics::{compute_metrics, InterviewMetrics};
use crate::workflows::interview::scoring::{aggregate, ReadinessBand, ScoreSummary};
use backfill::backfill_blockers;

/// Substituted when the narrative parsed but carried no usable summary.
pub(crate) const GENERIC_SUMMARY: &str =
    "The interview was scored, but a narrative summary could not be generated for this attempt.";

/// Substituted when the narrative backend was unreachable or unusable.
pub(crate) const UNAVAILABLE_SUMMARY: &str =
    "Narrative generation was unavailable; the scores in this report were computed \
     deterministically from the recorded answers.";

const MAX_LIST_ITEMS: usize = 8;

/// Tuning for narrative generation, injected at construction.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeOptions {
    pub offline: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            offline: false,
            temperature: 0.4,
            max_tokens: 1200,
        }
    }
}

/// Builds the readiness report for a completed interview.
pub struct ReportGenerator {
    model: Option<Arc<dyn TextGeneration>>,
    options: NarrativeOptions,
}

impl ReportGenerator {
    pub fn new(model: Arc<dyn TextGeneration>, options: NarrativeOptions) -> Self {
        Self {
            model: Some(model),
            options,
        }
    }

    /// Generator with no backend; always produces the templated report.
    pub fn offline() -> Self {
        Self {
            model: None,
            options: NarrativeOptions {
                offline: true,
                ..NarrativeOptions::default()
            },
        }
    }

    pub async fn generate(
        &self,
        interview: &Interview,
        evaluations: &[Evaluation],
        context: Option<&JobContext>,
    ) -> Report {
        let scores = aggregate(&interview.questions, evaluations);
        let metrics = compute_metrics(&interview.questions, &interview.effective_answers());

        let model = match (&self.model, self.options.offline) {
            (Some(model), false) => model,
            _ => return offline_report(interview, &scores, metrics),
        };

        let prompt = build_report_prompt(interview, evaluations, &scores, &metrics, context);
        let completion = CompletionOptions {
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let raw = match model.complete(&prompt, completion).await {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "narrative generation call failed");
                return unavailable_report(interview, &scores, metrics);
            }
        };

        let Some(value) = extract_json_object(&raw) else {
            warn!("narrative response contained no parseable JSON object");
            return unavailable_report(interview, &scores, metrics);
        };

        assemble_report(interview, &scores, metrics, validate_narrative(&value))
    }
}

/// The backend's narrative, validated field by field. Blockers missing any
/// required field have already been dropped.
#[derive(Debug, Default)]
struct RawNarrative {
    summary: Option<String>,
    blockers: Vec<Blocker>,
    strengths: Vec<String>,
    areas_for_improvement: Vec<String>,
    recommendations: Vec<String>,
    ai_confidence: Option<f64>,
}

fn validate_narrative(value: &Value) -> RawNarrative {
    let blockers = value
        .get("primaryBlockers")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_blocker).collect())
        .unwrap_or_default();

    RawNarrative {
        summary: string_field(value, "summary"),
        blockers,
        strengths: string_list(value, "strengths"),
        areas_for_improvement: string_list(value, "areasForImprovement"),
        recommendations: string_list(value, "recommendations"),
        ai_confidence: number_field(value, "aiConfidence"),
    }
}

/// A blocker is only accepted when all six fields are present and valid.
fn parse_blocker(value: &Value) -> Option<Blocker> {
    let question_id = string_field(value, "questionId")?;
    let question_text = string_field(value, "questionText")?;
    let question_kind = match string_field(value, "questionType")?.to_ascii_lowercase().as_str() {
        "technical" => QuestionKind::Technical,
        "behavioral" => QuestionKind::Behavioral,
        _ => return None,
    };
    let issue = string_field(value, "issue")?;
    let severity = BlockerSeverity::parse(&string_field(value, "severity")?)?;
    let impact = string_field(value, "impact")?;

    Some(Blocker {
        question_id: QuestionId(question_id),
        question_text,
        question_kind,
        issue,
        severity,
        impact,
    })
}

fn assemble_report(
    interview: &Interview,
    scores: &ScoreSummary,
    metrics: InterviewMetrics,
    narrative: RawNarrative,
) -> Report {
    let primary_blockers =
        backfill_blockers(narrative.blockers, &scores.per_question, &interview.questions);

    let summary = narrative
        .summary
        .unwrap_or_else(|| GENERIC_SUMMARY.to_string());

    let mut strengths = narrative.strengths;
    strengths.truncate(MAX_LIST_ITEMS);
    let mut areas_for_improvement = narrative.areas_for_improvement;
    areas_for_improvement.truncate(MAX_LIST_ITEMS);
    let mut recommendations = narrative.recommendations;
    recommendations.truncate(MAX_LIST_ITEMS);

    let ai_confidence = calibrate_confidence(
        narrative.ai_confidence.unwrap_or(0.5).clamp(0.0, 1.0) as f32,
        &metrics,
    );

    Report {
        overall_score: scores.overall_score,
        technical_score: scores.technical_score,
        behavioral_score: scores.behavioral_score,
        readiness_band: scores.readiness_band,
        summary,
        primary_blockers,
        strengths,
        areas_for_improvement,
        recommendations,
        metrics,
        ai_confidence,
    }
}

/// A report with no evaluation evidence cannot be confident.
fn calibrate_confidence(confidence: f32, metrics: &InterviewMetrics) -> f32 {
    if metrics.questions_answered == 0 {
        confidence.min(0.3)
    } else {
        confidence
    }
}

fn question_text<'a>(questions: &'a [Question], id: &QuestionId) -> &'a str {
    questions
        .iter()
        .find(|question| &question.id == id)
        .map(|question| question.text.as_str())
        .unwrap_or_default()
}

/// Fixed templated report for offline mode. Deterministic, no backend call.
fn offline_report(
    interview: &Interview,
    scores: &ScoreSummary,
    metrics: InterviewMetrics,
) -> Report {
    let summary = format!(
        "Offline readiness report: overall {}/100 ({}). {} of {} questions answered.",
        scores.overall_score,
        scores.readiness_band.label(),
        metrics.questions_answered,
        metrics.total_questions,
    );

    let strengths: Vec<String> = scores
        .per_question
        .iter()
        .filter(|row| row.score >= 70)
        .take(MAX_LIST_ITEMS)
        .map(|row| {
            format!(
                "Scored {}/100 on \"{}\"",
                row.score,
                question_text(&interview.questions, &row.question_id)
            )
        })
        .collect();

    let areas_for_improvement: Vec<String> = scores
        .per_question
        .iter()
        .filter(|row| row.score < 60)
        .take(MAX_LIST_ITEMS)
        .map(|row| {
            format!(
                "Scored {}/100 on \"{}\"",
                row.score,
                question_text(&interview.questions, &row.question_id)
            )
        })
        .collect();

    let recommendations = match scores.readiness_band {
        ReadinessBand::Ready => vec![
            "Keep interviewing skills warm with a weekly practice session.".to_string(),
            "Rehearse concise delivery for the strongest answers.".to_string(),
        ],
        ReadinessBand::AlmostReady => vec![
            "Focus practice on the lowest scoring questions below.".to_string(),
            "Rework weak answers aloud, then re-run a mock interview.".to_string(),
            "Prepare concrete examples with measurable outcomes.".to_string(),
        ],
        ReadinessBand::NeedsWork => vec![
            "Revisit the fundamentals behind each low scoring question.".to_string(),
            "Draft structured answers before attempting another mock interview.".to_string(),
            "Practice answering out loud to build fluency and depth.".to_string(),
        ],
    };

    let ai_confidence = calibrate_confidence(0.5, &metrics);

    Report {
        overall_score: scores.overall_score,
        technical_score: scores.technical_score,
        behavioral_score: scores.behavioral_score,
        readiness_band: scores.readiness_band,
        summary,
        primary_blockers: backfill_blockers(
            Vec::new(),
            &scores.per_question,
            &interview.questions,
        ),
        strengths,
        areas_for_improvement,
        recommendations,
        metrics,
        ai_confidence,
    }
}

/// Total-failure report: computed numbers, backfilled blockers, fixed
/// summary, confidence pinned low.
fn unavailable_report(
    interview: &Interview,
    scores: &ScoreSummary,
    metrics: InterviewMetrics,
) -> Report {
    Report {
        overall_score: scores.overall_score,
        technical_score: scores.technical_score,
        behavioral_score: scores.behavioral_score,
        readiness_band: scores.readiness_band,
        summary: UNAVAILABLE_SUMMARY.to_string(),
        primary_blockers: backfill_blockers(
            Vec::new(),
            &scores.per_question,
            &interview.questions,
        ),
        strengths: Vec::new(),
        areas_for_improvement: Vec::new(),
        recommendations: Vec::new(),
        metrics,
        ai_confidence: 0.25,
    }
}

fn build_report_prompt(
    interview: &Interview,
    evaluations: &[Evaluation],
    scores: &ScoreSummary,
    metrics: &InterviewMetrics,
    context: Option<&JobContext>,
) -> String {
    let mut prompt = String::new();

    writeln!(
        prompt,
        "You are an interview coach writing a readiness report for a candidate who just \
         finished a mock interview."
    )
    .expect("write preamble");
    writeln!(
        prompt,
        "The numeric scores below were computed deterministically and are final. Echo them \
         unchanged; do not rescore anything."
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

    writeln!(prompt, "COMPUTED RESULTS (non-negotiable):").expect("write results");
    writeln!(prompt, "- overallScore: {}/100", scores.overall_score).expect("write results");
    writeln!(
        prompt,
        "- technicalScore: {}",
        scores
            .technical_score
            .map(|score| format!("{score}/100"))
            .unwrap_or_else(|| "n/a (no technical questions)".to_string())
    )
    .expect("write results");
    writeln!(
        prompt,
        "- behavioralScore: {}",
        scores
            .behavioral_score
            .map(|score| format!("{score}/100"))
            .unwrap_or_else(|| "n/a (no behavioral questions)".to_string())
    )
    .expect("write results");
    writeln!(prompt, "- readinessBand: {}", scores.readiness_band.label()).expect("write results");
    writeln!(
        prompt,
        "- answered {} of {} questions ({} skipped), average answer length {} words",
        metrics.questions_answered,
        metrics.total_questions,
        metrics.questions_skipped,
        metrics.average_answer_length,
    )
    .expect("write results");
    prompt.push('\n');

    writeln!(prompt, "PER-QUESTION EVIDENCE:").expect("write evidence");
    for row in &scores.per_question {
        let evaluation = evaluations
            .iter()
            .find(|evaluation| evaluation.question_id == row.question_id);
        let text = question_text(&interview.questions, &row.question_id);

        match evaluation {
            Some(evaluation) => {
                writeln!(
                    prompt,
                    "- [{}] ({}, weight {:.1}) \"{}\" scored {}/100; issues: {}; strengths: {}",
                    row.question_id.as_str(),
                    row.kind.label(),
                    row.weight,
                    text,
                    row.score,
                    join_or_none(&evaluation.detected_issues),
                    join_or_none(&evaluation.strengths),
                )
                .expect("write evidence row");
            }
            None => {
                writeln!(
                    prompt,
                    "- [{}] ({}, weight {:.1}) \"{}\" NO EVALUATION (scored 0)",
                    row.question_id.as_str(),
                    row.kind.label(),
                    row.weight,
                    text,
                )
                .expect("write evidence row");
            }
        }
    }
    prompt.push('\n');

    writeln!(prompt, "Return exactly this JSON shape, no prose outside it:").expect("write shape");
    writeln!(prompt, "{{").expect("write shape");
    writeln!(prompt, "  \"summary\": \"<3-5 sentence narrative for the candidate>\",")
        .expect("write shape");
    writeln!(
        prompt,
        "  \"primaryBlockers\": [{{\"questionId\": \"...\", \"questionText\": \"...\", \
         \"questionType\": \"technical|behavioral\", \"issue\": \"...\", \
         \"severity\": \"low|medium|high\", \"impact\": \"...\"}}],"
    )
    .expect("write shape");
    writeln!(
        prompt,
        "  \"strengths\": [\"...\"], \"areasForImprovement\": [\"...\"], \
         \"recommendations\": [\"...\"],"
    )
    .expect("write shape");
    writeln!(prompt, "  \"aiConfidence\": <0.0-1.0>").expect("write shape");
    writeln!(prompt, "}}").expect("write shape");
    writeln!(
        prompt,
        "primaryBlockers must contain 3 to 5 entries sorted by severity from high to low, \
         each tied to a real questionId from the evidence above."
    )
    .expect("write shape");

    prompt
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none noted".to_string()
    } else {
        items.join("; ")
    }
}
