use pmp_core::model::{DomainStatsMap, Letter, PracticeSession, Question, QuizSession};

use crate::error::QuizError;

/// What the UI shows after an answer is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub question: Question,
    pub selected: Letter,
    pub correct_option: Letter,
    pub is_correct: bool,
    pub explanation: String,
    /// Number of answers recorded so far, this one included.
    pub answered: usize,
}

/// Results of a finished practice session.
///
/// Returned even when saving failed; `warning` then holds the
/// `QuizError::PersistFailed` to show next to the results.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishOutcome {
    pub session: QuizSession,
    pub stats: DomainStatsMap,
    pub overall_percentage: f64,
    pub saved: Option<PracticeSession>,
    pub warning: Option<QuizError>,
}

impl FinishOutcome {
    #[must_use]
    pub fn persisted(&self) -> bool {
        self.saved.is_some()
    }
}
