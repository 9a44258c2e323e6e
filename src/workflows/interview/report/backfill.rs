//! Deterministic blocker synthesis for when the narrative backend supplies
//! too few valid blockers (or none at all). No backend call anywhere here.

use std::collections::{HashMap, HashSet};

use super::views::{Blocker, BlockerSeverity};
use crate::workflows::interview::domain::{Question, QuestionId, QuestionKind};
use crate::workflows::interview::scoring::ScoreRow;

const MIN_BLOCKERS: usize = 3;
const MAX_BLOCKERS: usize = 5;

/// Ensures the report carries between 3 and 5 blockers whenever the
/// interview has at least one question.
///
/// Valid narrative blockers are kept; if fewer than 3 remain, rows are
/// ranked by `weight * (100 - score)` and synthesized blockers fill the
/// list up to 5. Interviews with fewer than three questions are padded
/// with a fixed limited-evidence blocker on the weakest row.
pub(crate) fn backfill_blockers(
    mut blockers: Vec<Blocker>,
    rows: &[ScoreRow],
    questions: &[Question],
) -> Vec<Blocker> {
    blockers.truncate(MAX_BLOCKERS);

    if blockers.len() < MIN_BLOCKERS && !rows.is_empty() {
        let text_by_id: HashMap<&QuestionId, &str> = questions
            .iter()
            .map(|question| (&question.id, question.text.as_str()))
            .collect();
        let covered: HashSet<QuestionId> = blockers
            .iter()
            .map(|blocker| blocker.question_id.clone())
            .collect();

        let mut ranked: Vec<&ScoreRow> = rows.iter().collect();
        ranked.sort_by(|a, b| {
            let deficit_a = f64::from(a.weight) * (100.0 - f64::from(a.score.min(100)));
            let deficit_b = f64::from(b.weight) * (100.0 - f64::from(b.score.min(100)));
            deficit_b
                .partial_cmp(&deficit_a)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for row in ranked
            .iter()
            .filter(|row| !covered.contains(&row.question_id))
        {
            if blockers.len() >= MAX_BLOCKERS {
                break;
            }
            let text = text_by_id
                .get(&row.question_id)
                .copied()
                .unwrap_or_default();
            blockers.push(synthesized_blocker(row, text));
        }

        // With one or two questions the synthesized rows can't reach the
        // floor on their own; pad on the weakest row.
        if let Some(weakest) = ranked.first() {
            let text = text_by_id
                .get(&weakest.question_id)
                .copied()
                .unwrap_or_default();
            while blockers.len() < MIN_BLOCKERS {
                blockers.push(evidence_blocker(weakest, text));
            }
        }
    }

    blockers.sort_by_key(|blocker| std::cmp::Reverse(blocker.severity.rank()));
    blockers.truncate(MAX_BLOCKERS);
    blockers
}

fn severity_for(score: u8) -> BlockerSeverity {
    if score < 30 {
        BlockerSeverity::High
    } else if score < 60 {
        BlockerSeverity::Medium
    } else {
        BlockerSeverity::Low
    }
}

fn synthesized_blocker(row: &ScoreRow, question_text: &str) -> Blocker {
    let (issue, impact) = match row.kind {
        QuestionKind::Technical => (
            format!(
                "Technical answer scored {}/100 and needs stronger substance",
                row.score
            ),
            "Low technical scores weigh heaviest against overall readiness for this role."
                .to_string(),
        ),
        QuestionKind::Behavioral => (
            format!(
                "Behavioral answer scored {}/100 and lacked a structured story",
                row.score
            ),
            "Weak behavioral answers undermine how convincingly experience comes across."
                .to_string(),
        ),
    };

    Blocker {
        question_id: row.question_id.clone(),
        question_text: question_text.to_string(),
        question_kind: row.kind,
        issue,
        severity: severity_for(row.score),
        impact,
    }
}

fn evidence_blocker(row: &ScoreRow, question_text: &str) -> Blocker {
    Blocker {
        question_id: row.question_id.clone(),
        question_text: question_text.to_string(),
        question_kind: row.kind,
        issue: "Not enough evidence to fully assess this area".to_string(),
        severity: BlockerSeverity::Low,
        impact: "More practice answers are needed before readiness can be judged with confidence."
            .to_string(),
    }
}
