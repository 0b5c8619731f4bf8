use services::SubmitOutcome;

/// What is shown right after an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealVm {
    pub is_correct: bool,
    pub selected: char,
    pub correct: char,
    pub correct_text: String,
    pub explanation: String,
    pub answered: usize,
}

impl From<&SubmitOutcome> for RevealVm {
    fn from(outcome: &SubmitOutcome) -> Self {
        let correct_text = outcome
            .question
            .options()
            .get(outcome.correct_option.index())
            .map(|option| option.text.clone())
            .unwrap_or_default();
        Self {
            is_correct: outcome.is_correct,
            selected: outcome.selected.as_char(),
            correct: outcome.correct_option.as_char(),
            correct_text,
            explanation: outcome.explanation.clone(),
            answered: outcome.answered,
        }
    }
}
