use serde::{Deserialize, Serialize};

use super::domain::{Answer, Question};

/// Descriptive statistics about how the interview went, shown alongside the
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewMetrics {
    /// Mean transcript length in words across answered questions.
    pub average_answer_length: u32,
    pub questions_answered: u32,
    pub questions_skipped: u32,
    pub total_questions: u32,
}

fn answered(answer: &Answer) -> bool {
    !answer.skipped && !answer.transcript.trim().is_empty()
}

/// Counts are taken over the effective answer set (one per question, last
/// write wins); `total_questions` comes from the question list, not from
/// how many answers arrived.
pub fn compute_metrics(questions: &[Question], answers: &[&Answer]) -> InterviewMetrics {
    let questions_answered = answers.iter().filter(|answer| answered(answer)).count();
    let questions_skipped = answers.iter().filter(|answer| answer.skipped).count();

    let total_words: usize = answers
        .iter()
        .filter(|answer| answered(answer))
        .map(|answer| answer.transcript.split_whitespace().count())
        .sum();

    let average_answer_length = if questions_answered == 0 {
        0
    } else {
        (total_words as f64 / questions_answered as f64).round() as u32
    };

    InterviewMetrics {
        average_answer_length,
        questions_answered: questions_answered as u32,
        questions_skipped: questions_skipped as u32,
        total_questions: questions.len() as u32,
    }
}
