use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier wrapper for interview questions, unique within an interview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether a question probes technical or behavioral competence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Technical,
    Behavioral,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
        }
    }
}

fn default_weight() -> f32 {
    1.0
}

/// A single interview question. Immutable once the interview starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// A candidate's submitted (or skipped) answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    pub transcript: String,
    #[serde(default)]
    pub skipped: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Optional description of the job the candidate is practicing for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobContext {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// An interview session: the question list plus whatever answers were
/// submitted. Resubmitting an answer replaces the prior one, with the
/// latest `submitted_at` winning; the raw submission log is kept as
/// received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Interview {
    /// Latest answer for a question by submission time. Identical timestamps
    /// resolve to the later entry in the submission log.
    pub fn answer_for(&self, id: &QuestionId) -> Option<&Answer> {
        self.answers
            .iter()
            .filter(|answer| &answer.question_id == id)
            .max_by_key(|answer| answer.submitted_at)
    }

    /// One answer per question, last write wins, in question order.
    pub fn effective_answers(&self) -> Vec<&Answer> {
        self.questions
            .iter()
            .filter_map(|question| self.answer_for(&question.id))
            .collect()
    }

    /// Rejects structurally broken input before the pipeline runs.
    pub fn validate(&self) -> Result<(), InterviewValidationError> {
        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(&question.id) {
                return Err(InterviewValidationError::DuplicateQuestion(
                    question.id.clone(),
                ));
            }
            if !(question.weight.is_finite() && question.weight > 0.0) {
                return Err(InterviewValidationError::InvalidWeight(question.id.clone()));
            }
        }

        for answer in &self.answers {
            if !seen.contains(&answer.question_id) {
                return Err(InterviewValidationError::UnknownQuestion(
                    answer.question_id.clone(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterviewValidationError {
    #[error("duplicate question id '{}'", .0.as_str())]
    DuplicateQuestion(QuestionId),
    #[error("question '{}' must have a positive finite weight", .0.as_str())]
    InvalidWeight(QuestionId),
    #[error("answer references unknown question id '{}'", .0.as_str())]
    UnknownQuestion(QuestionId),
}

/// Scored assessment of one answer. Re-derivable from the (question, answer)
/// pair at any time; `technical_accuracy` is present exactly when the
/// question is technical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub question_id: QuestionId,
    pub relevance_score: u8,
    pub clarity_score: u8,
    pub depth_score: u8,
    pub technical_accuracy: Option<u8>,
    pub feedback: String,
    #[serde(default)]
    pub detected_issues: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub confidence: f32,
}
