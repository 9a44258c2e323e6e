use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::llm::{CompletionOptions, TextGeneration, TextGenerationError};
use crate::workflows::interview::domain::{
    Answer, Evaluation, Interview, Question, QuestionId, QuestionKind,
};

pub(super) fn question(id: &str, kind: QuestionKind, weight: f32) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        text: format!("Question {id}?"),
        kind,
        weight,
    }
}

pub(super) fn answer(id: &str, transcript: &str) -> Answer {
    answer_at(id, transcript, 0)
}

/// Answer submitted `minutes` past the fixed base time.
pub(super) fn answer_at(id: &str, transcript: &str, minutes: u32) -> Answer {
    Answer {
        question_id: QuestionId(id.to_string()),
        transcript: transcript.to_string(),
        skipped: false,
        submitted_at: Utc.with_ymd_and_hms(2026, 3, 14, 10, minutes, 0).unwrap(),
    }
}

pub(super) fn skipped_answer(id: &str) -> Answer {
    Answer {
        skipped: true,
        ..answer(id, "")
    }
}

pub(super) fn interview(questions: Vec<Question>, answers: Vec<Answer>) -> Interview {
    Interview { questions, answers }
}

/// Evaluation with every dimension set to the same value, so the composite
/// row score equals that value for either question kind.
pub(super) fn uniform_evaluation(id: &str, kind: QuestionKind, score: u8) -> Evaluation {
    Evaluation {
        question_id: QuestionId(id.to_string()),
        relevance_score: score,
        clarity_score: score,
        depth_score: score,
        technical_accuracy: match kind {
            QuestionKind::Technical => Some(score),
            QuestionKind::Behavioral => None,
        },
        feedback: String::new(),
        detected_issues: Vec::new(),
        strengths: Vec::new(),
        keywords: Vec::new(),
        confidence: 0.8,
    }
}

/// One step of a scripted backend conversation.
pub(super) enum ScriptStep {
    Reply(String),
    Fail,
}

/// In-memory `TextGeneration` standing in for the remote backend. Replays a
/// fixed script and records every prompt it was given.
pub(super) struct ScriptedModel {
    script: Mutex<VecDeque<ScriptStep>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub(super) fn new(script: Vec<ScriptStep>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![ScriptStep::Reply(text.to_string())])
    }

    pub(super) fn failing() -> Arc<Self> {
        Self::new(vec![ScriptStep::Fail])
    }

    pub(super) fn call_count(&self) -> usize {
        self.prompts.lock().expect("prompt mutex poisoned").len()
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl TextGeneration for ScriptedModel {
    async fn complete(
        &self,
        prompt: &str,
        _options: CompletionOptions,
    ) -> Result<String, TextGenerationError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());

        match self
            .script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
        {
            Some(ScriptStep::Reply(text)) => Ok(text),
            Some(ScriptStep::Fail) => {
                Err(TextGenerationError::Unavailable("scripted outage".to_string()))
            }
            None => Err(TextGenerationError::Unavailable(
                "script exhausted".to_string(),
            )),
        }
    }
}
