//! Deterministic score aggregation. Pure functions only: same inputs, same
//! output, no backend involvement anywhere in this module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{Evaluation, Question, QuestionId, QuestionKind};

/// Coarse classification of the overall score.
///
/// This is the only place a band is ever produced; the narrative backend
/// never gets a say in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessBand {
    #[serde(rename = "Ready")]
    Ready,
    #[serde(rename = "Almost Ready")]
    AlmostReady,
    #[serde(rename = "Needs Work")]
    NeedsWork,
}

impl ReadinessBand {
    pub fn from_overall(overall_score: u8) -> Self {
        if overall_score >= 80 {
            Self::Ready
        } else if overall_score >= 60 {
            Self::AlmostReady
        } else {
            Self::NeedsWork
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::AlmostReady => "Almost Ready",
            Self::NeedsWork => "Needs Work",
        }
    }
}

/// Per-question composite score, kept alongside the aggregates so reports
/// can show their work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub question_id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub weight: f32,
    pub score: u8,
}

/// Aggregated scores for one interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub per_question: Vec<ScoreRow>,
    pub overall_score: u8,
    pub technical_score: Option<u8>,
    pub behavioral_score: Option<u8>,
    pub readiness_band: ReadinessBand,
}

/// Composite score for a single evaluated question.
///
/// Technical answers weigh accuracy heaviest; behavioral answers lean on
/// relevance and delivery.
fn question_score(kind: QuestionKind, evaluation: &Evaluation) -> u8 {
    let relevance = f64::from(evaluation.relevance_score);
    let clarity = f64::from(evaluation.clarity_score);
    let depth = f64::from(evaluation.depth_score);

    let composite = match kind {
        QuestionKind::Technical => {
            let accuracy = f64::from(evaluation.technical_accuracy.unwrap_or(0));
            0.35 * accuracy + 0.25 * depth + 0.20 * relevance + 0.20 * clarity
        }
        QuestionKind::Behavioral => 0.40 * relevance + 0.30 * clarity + 0.30 * depth,
    };

    composite.round().clamp(0.0, 100.0) as u8
}

/// `round(sum(weight * score) / sum(weight))`, or 0 when no weight at all.
fn weighted_average<'a, I>(rows: I) -> u8
where
    I: Iterator<Item = &'a ScoreRow>,
{
    let mut weighted_sum = 0.0_f64;
    let mut weight_total = 0.0_f64;
    for row in rows {
        weighted_sum += f64::from(row.weight) * f64::from(row.score);
        weight_total += f64::from(row.weight);
    }

    if weight_total <= 0.0 {
        0
    } else {
        (weighted_sum / weight_total).round().clamp(0.0, 100.0) as u8
    }
}

/// Combines per-question evaluations into the interview's numeric scores.
///
/// Every question contributes a row: questions without an evaluation score 0
/// and stay in the denominator. Evaluations for unknown question ids are
/// ignored.
pub fn aggregate(questions: &[Question], evaluations: &[Evaluation]) -> ScoreSummary {
    let by_question: HashMap<&QuestionId, &Evaluation> = evaluations
        .iter()
        .map(|evaluation| (&evaluation.question_id, evaluation))
        .collect();

    let per_question: Vec<ScoreRow> = questions
        .iter()
        .map(|question| ScoreRow {
            question_id: question.id.clone(),
            kind: question.kind,
            weight: question.weight,
            score: by_question
                .get(&question.id)
                .map(|evaluation| question_score(question.kind, evaluation))
                .unwrap_or(0),
        })
        .collect();

    let overall_score = weighted_average(per_question.iter());

    let technical_score = if per_question.iter().any(|row| row.kind == QuestionKind::Technical) {
        Some(weighted_average(
            per_question
                .iter()
                .filter(|row| row.kind == QuestionKind::Technical),
        ))
    } else {
        None
    };

    let behavioral_score = if per_question.iter().any(|row| row.kind == QuestionKind::Behavioral) {
        Some(weighted_average(
            per_question
                .iter()
                .filter(|row| row.kind == QuestionKind::Behavioral),
        ))
    } else {
        None
    };

    ScoreSummary {
        per_question,
        overall_score,
        technical_score,
        behavioral_score,
        readiness_band: ReadinessBand::from_overall(overall_score),
    }
}
