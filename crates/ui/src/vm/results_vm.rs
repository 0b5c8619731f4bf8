use pmp_core::model::{DomainStats, DomainTag};
use services::FinishOutcome;

use crate::vm::time_fmt::format_percentage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainCardVm {
    pub label: &'static str,
    pub correct: u32,
    pub total: u32,
    pub percentage_str: String,
}

impl DomainCardVm {
    #[must_use]
    pub fn new(tag: DomainTag, stats: DomainStats) -> Self {
        Self {
            label: tag.label(),
            correct: stats.correct,
            total: stats.total,
            percentage_str: format_percentage(stats.percentage()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRowVm {
    pub number: usize,
    pub question: String,
    pub selected: char,
    pub correct: char,
    pub is_correct: bool,
}

/// Summary of a finished session. Only domains that were practiced get a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub domains: Vec<DomainCardVm>,
    pub answered: usize,
    pub correct: usize,
    pub overall_str: String,
    pub answers: Vec<AnswerRowVm>,
    pub saved: bool,
    pub warning: Option<String>,
}

impl From<&FinishOutcome> for ResultsVm {
    fn from(outcome: &FinishOutcome) -> Self {
        let answers = outcome
            .session
            .answers()
            .iter()
            .enumerate()
            .map(|(i, answer)| AnswerRowVm {
                number: i + 1,
                question: answer.question_text().to_string(),
                selected: answer.selected_option().as_char(),
                correct: answer.correct_option().as_char(),
                is_correct: answer.is_correct(),
            })
            .collect();
        Self {
            domains: outcome
                .stats
                .iter()
                .map(|(tag, stats)| DomainCardVm::new(tag, stats))
                .collect(),
            answered: outcome.session.answered_count(),
            correct: outcome.session.correct_count(),
            overall_str: format_percentage(outcome.overall_percentage),
            answers,
            saved: outcome.persisted(),
            warning: outcome.warning.as_ref().map(ToString::to_string),
        }
    }
}
