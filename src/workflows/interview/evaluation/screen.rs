//! Local answer classification, independent of the text-generation backend.

/// Filler phrases that count as not answering at all (case-insensitive
/// exact match on the trimmed transcript).
const FILLER_PHRASES: &[&str] = &[
    "idk",
    "i don't know",
    "i dont know",
    "dont know",
    "no idea",
    "n/a",
    "na",
    "none",
    "skip",
    "pass",
    "nothing",
    "dunno",
    "not sure",
    "no clue",
];

/// Unprofessional tokens checked by substring match.
const HOSTILE_TOKENS: &[&str] = &[
    "stupid question",
    "dumb question",
    "this is dumb",
    "this is pointless",
    "waste of time",
    "screw this",
    "shut up",
    "who cares",
];

/// Transcript values used by the UI to mark a question as passed over.
const SKIP_SENTINELS: &[&str] = &["[skipped]", "[not answered]"];

/// What the deterministic rules concluded about a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnswerScreen {
    pub word_count: usize,
    pub non_answer: bool,
    pub hostile: bool,
}

impl AnswerScreen {
    pub(crate) fn degenerate(&self) -> bool {
        self.non_answer || self.hostile
    }
}

/// True for transcripts that must short-circuit to a zero evaluation
/// without consulting the backend at all.
pub(crate) fn is_empty_or_sentinel(transcript: &str) -> bool {
    let trimmed = transcript.trim();
    trimmed.is_empty()
        || SKIP_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

pub(crate) fn screen_answer(transcript: &str) -> AnswerScreen {
    let trimmed = transcript.trim();
    let lowered = trimmed.to_lowercase();

    let word_count = trimmed.split_whitespace().count();
    let non_answer =
        trimmed.chars().count() <= 3 || FILLER_PHRASES.iter().any(|phrase| lowered == *phrase);
    let hostile = HOSTILE_TOKENS.iter().any(|token| lowered.contains(token));

    AnswerScreen {
        word_count,
        non_answer,
        hostile,
    }
}
