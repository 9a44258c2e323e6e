use serde::{Deserialize, Serialize};

use crate::workflows::interview::domain::{QuestionId, QuestionKind};
use crate::workflows::interview::metrics::InterviewMetrics;
use crate::workflows::interview::scoring::ReadinessBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockerSeverity {
    Low,
    Medium,
    High,
}

impl BlockerSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Higher means more severe; used to sort blockers high to low.
    pub(crate) const fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A question-level weakness flagged as holding back readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blocker {
    pub question_id: QuestionId,
    pub question_text: String,
    #[serde(rename = "questionType")]
    pub question_kind: QuestionKind,
    pub issue: String,
    pub severity: BlockerSeverity,
    pub impact: String,
}

/// The readiness report handed to storage and the UI.
///
/// Numeric fields and the band always come from the deterministic
/// aggregator; the narrative backend only ever contributes prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub overall_score: u8,
    pub technical_score: Option<u8>,
    pub behavioral_score: Option<u8>,
    pub readiness_band: ReadinessBand,
    pub summary: String,
    pub primary_blockers: Vec<Blocker>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
    pub metrics: InterviewMetrics,
    pub ai_confidence: f32,
}
