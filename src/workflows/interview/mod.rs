//! The interview readiness pipeline: per-answer evaluation, deterministic
//! score aggregation, descriptive metrics, and report generation.

pub mod domain;
pub mod evaluation;
pub mod metrics;
pub mod report;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, Evaluation, Interview, InterviewValidationError, JobContext, Question, QuestionId,
    QuestionKind,
};
pub use evaluation::{AnswerEvaluator, EvaluatorOptions};
pub use metrics::{compute_metrics, InterviewMetrics};
pub use report::{Blocker, BlockerSeverity, NarrativeOptions, Report, ReportGenerator};
pub use scoring::{aggregate, ReadinessBand, ScoreRow, ScoreSummary};
