mod rubric;
mod screen;

pub(crate) use rubric::{NO_ANSWER_FEEDBACK, UNAVAILABLE_FEEDBACK};

use std::sync::Arc;

use tracing::warn;

use crate::llm::{extract_json_object, CompletionOptions, TextGeneration};
use crate::workflows::interview::domain::{Answer, Evaluation, Interview, JobContext, Question};

/// Tuning for the evaluator, injected at construction.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatorOptions {
    /// Skip the backend entirely and score deterministically from length.
    pub offline: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            offline: false,
            temperature: 0.2,
            max_tokens: 700,
        }
    }
}

/// Stateless scorer for one (question, answer) pair.
///
/// Wraps the text-generation backend but never propagates its failures: a
/// call that errors out or returns garbage degrades to a low confidence
/// fallback for that question only.
pub struct AnswerEvaluator {
    model: Option<Arc<dyn TextGeneration>>,
    options: EvaluatorOptions,
}

impl AnswerEvaluator {
    pub fn new(model: Arc<dyn TextGeneration>, options: EvaluatorOptions) -> Self {
        Self {
            model: Some(model),
            options,
        }
    }

    /// Evaluator with no backend at all; always scores offline.
    pub fn offline() -> Self {
        Self {
            model: None,
            options: EvaluatorOptions {
                offline: true,
                ..EvaluatorOptions::default()
            },
        }
    }

    pub async fn evaluate(
        &self,
        question: &Question,
        answer: Option<&Answer>,
        context: Option<&JobContext>,
    ) -> Evaluation {
        let transcript = match answer {
            Some(answer) if !answer.skipped => answer.transcript.trim(),
            _ => "",
        };

        if screen::is_empty_or_sentinel(transcript) {
            return rubric::zero_evaluation(question);
        }

        let screen = screen::screen_answer(transcript);

        let model = match (&self.model, self.options.offline) {
            (Some(model), false) => model,
            _ => return rubric::offline_evaluation(question, screen),
        };

        let prompt = rubric::build_evaluation_prompt(question, transcript, context);
        let completion = CompletionOptions {
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let raw = match model.complete(&prompt, completion).await {
            Ok(text) => text,
            Err(err) => {
                warn!(question = question.id.as_str(), %err, "evaluation call failed");
                return rubric::fallback_evaluation(question, screen);
            }
        };

        match extract_json_object(&raw) {
            Some(value) => rubric::apply_rubric(question, screen, rubric::validate_raw(&value)),
            None => {
                warn!(
                    question = question.id.as_str(),
                    "evaluation response contained no parseable JSON object"
                );
                rubric::fallback_evaluation(question, screen)
            }
        }
    }

    /// Evaluates every question in the interview, in question order.
    ///
    /// Runs sequentially; a failure on one question produces a fallback
    /// entry for that question and never aborts the batch.
    pub async fn evaluate_all(
        &self,
        interview: &Interview,
        context: Option<&JobContext>,
    ) -> Vec<Evaluation> {
        let mut evaluations = Vec::with_capacity(interview.questions.len());
        for question in &interview.questions {
            let answer = interview.answer_for(&question.id);
            evaluations.push(self.evaluate(question, answer, context).await);
        }
        evaluations
    }
}
