use std::fmt;

/// Where the practice flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizState {
    /// No valid identity; every practice action needs a login first.
    Unauthenticated,
    /// Logged in, at the menu, no question on screen.
    Idle,
    /// A question is shown and waits for an answer.
    AwaitingAnswer,
    /// The current question was answered and its result is shown.
    AnswerRevealed,
    /// Results of the last session are shown.
    Finished,
}

impl QuizState {
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        !matches!(self, QuizState::Unauthenticated)
    }

    /// Whether a practice session is in progress.
    #[must_use]
    pub fn in_practice(self) -> bool {
        matches!(self, QuizState::AwaitingAnswer | QuizState::AnswerRevealed)
    }
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizState::Unauthenticated => "logged out",
            QuizState::Idle => "at the menu",
            QuizState::AwaitingAnswer => "waiting for an answer",
            QuizState::AnswerRevealed => "showing an answer",
            QuizState::Finished => "showing results",
        };
        f.write_str(label)
    }
}
