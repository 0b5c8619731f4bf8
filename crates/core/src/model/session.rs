use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DomainTag, Letter, Question, QuestionError};

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// Record of one submitted answer.
///
/// Copies the question text and explanation so the record outlives the
/// question it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    question_text: String,
    selected_option: Letter,
    correct_option: Letter,
    is_correct: bool,
    domain: DomainTag,
    explanation: String,
}

impl QuizAnswer {
    /// Score `selected_index` against `question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::IndexOutOfRange` if the index has no option.
    pub fn from_submission(question: &Question, selected_index: usize) -> Result<Self, QuestionError> {
        let selected_option = question.letter_for(selected_index)?;
        let correct_option = question.correct_letter();

        Ok(Self {
            question_text: question.question_text().to_owned(),
            selected_option,
            correct_option,
            is_correct: selected_option == correct_option,
            domain: question.domain(),
            explanation: question.explanation().to_owned(),
        })
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn selected_option(&self) -> Letter {
        self.selected_option
    }

    #[must_use]
    pub fn correct_option(&self) -> Letter {
        self.correct_option
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn domain(&self) -> DomainTag {
        self.domain
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Answered/correct counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainStats {
    pub total: u32,
    pub correct: u32,
}

impl DomainStats {
    #[must_use]
    pub fn new(total: u32, correct: u32) -> Self {
        Self { total, correct }
    }

    /// Share of correct answers in percent; `0.0` when nothing was answered.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }

    fn record(&mut self, is_correct: bool) {
        self.total = self.total.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }
}

impl std::ops::Add for DomainStats {
    type Output = DomainStats;

    fn add(self, rhs: Self) -> Self::Output {
        DomainStats {
            total: self.total.saturating_add(rhs.total),
            correct: self.correct.saturating_add(rhs.correct),
        }
    }
}

/// Per-domain stats with one slot per [`DomainTag`].
///
/// A domain nobody answered has no entry; it is not reported as `0/0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStatsMap {
    slots: [Option<DomainStats>; 3],
}

impl DomainStatsMap {
    #[must_use]
    pub fn get(&self, tag: DomainTag) -> Option<DomainStats> {
        self.slots[tag.index()]
    }

    /// Stats for `tag`, `0/0` when absent.
    #[must_use]
    pub fn get_or_zero(&self, tag: DomainTag) -> DomainStats {
        self.get(tag).unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, tag: DomainTag) -> bool {
        self.get(tag).is_some()
    }

    /// Present entries in [`DomainTag::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (DomainTag, DomainStats)> + '_ {
        DomainTag::ALL
            .into_iter()
            .filter_map(|tag| self.get(tag).map(|stats| (tag, stats)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum over every present domain.
    #[must_use]
    pub fn overall(&self) -> DomainStats {
        self.iter()
            .fold(DomainStats::default(), |acc, (_, stats)| acc + stats)
    }

    fn record(&mut self, tag: DomainTag, is_correct: bool) {
        self.slots[tag.index()]
            .get_or_insert_with(DomainStats::default)
            .record(is_correct);
    }
}

/// `sum(correct) / sum(total) * 100` across all domains, `0.0` when empty.
#[must_use]
pub fn overall_percentage(stats: &DomainStatsMap) -> f64 {
    stats.overall().percentage()
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice run: a start time and the answers given so far.
///
/// Answers are append-only and kept in the order they were submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    start_time: DateTime<Utc>,
    answers: Vec<QuizAnswer>,
}

impl QuizSession {
    #[must_use]
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            answers: Vec::new(),
        }
    }

    /// Append an answer. Repeated questions are recorded again.
    pub fn add_answer(&mut self, answer: QuizAnswer) {
        self.answers.push(answer);
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[must_use]
    pub fn stats_by_domain(&self) -> DomainStatsMap {
        self.answers
            .iter()
            .fold(DomainStatsMap::default(), |mut map, answer| {
                map.record(answer.domain(), answer.is_correct());
                map
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionOption;
    use crate::time::fixed_now;

    fn question(domain: DomainTag, text: &str) -> Question {
        Question::new(
            text,
            vec![
                QuestionOption::new("a", false),
                QuestionOption::new("b", true),
                QuestionOption::new("c", false),
            ],
            "b is right",
            domain,
        )
        .unwrap()
    }

    fn answer(domain: DomainTag, correct: bool) -> QuizAnswer {
        let index = if correct { 1 } else { 0 };
        QuizAnswer::from_submission(&question(domain, "Q"), index).unwrap()
    }

    #[test]
    fn answer_copies_question_and_scores_letters() {
        let q = question(DomainTag::Proceso, "Which one?");
        let right = QuizAnswer::from_submission(&q, 1).unwrap();
        assert!(right.is_correct());
        assert_eq!(right.selected_option().as_char(), 'B');
        assert_eq!(right.correct_option().as_char(), 'B');
        assert_eq!(right.question_text(), "Which one?");
        assert_eq!(right.explanation(), "b is right");
        assert_eq!(right.domain(), DomainTag::Proceso);

        let wrong = QuizAnswer::from_submission(&q, 2).unwrap();
        assert!(!wrong.is_correct());
        assert_eq!(wrong.selected_option().as_char(), 'C');
        assert_eq!(
            wrong.is_correct(),
            wrong.selected_option() == wrong.correct_option()
        );

        assert!(QuizAnswer::from_submission(&q, 3).is_err());
    }

    #[test]
    fn answers_keep_call_order_and_duplicates() {
        let mut session = QuizSession::new(fixed_now());
        let same = answer(DomainTag::Entorno, true);
        session.add_answer(same.clone());
        session.add_answer(same.clone());
        session.add_answer(answer(DomainTag::Personas, false));

        assert_eq!(session.answered_count(), 3);
        assert_eq!(session.answers()[0], same);
        assert_eq!(session.answers()[1], same);
        assert_eq!(session.answers()[2].domain(), DomainTag::Personas);
        assert_eq!(session.correct_count(), 2);
    }

    #[test]
    fn empty_session_has_empty_stats() {
        let session = QuizSession::new(fixed_now());
        let stats = session.stats_by_domain();
        assert!(stats.is_empty());
        assert_eq!(stats.iter().count(), 0);
        assert_eq!(overall_percentage(&stats), 0.0);
    }

    #[test]
    fn stats_fold_per_domain_and_omit_absent_domains() {
        let mut session = QuizSession::new(fixed_now());
        session.add_answer(answer(DomainTag::Personas, true));
        session.add_answer(answer(DomainTag::Personas, false));
        session.add_answer(answer(DomainTag::Proceso, true));

        let stats = session.stats_by_domain();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.get(DomainTag::Personas), Some(DomainStats::new(2, 1)));
        assert_eq!(stats.get(DomainTag::Proceso), Some(DomainStats::new(1, 1)));
        assert_eq!(stats.get(DomainTag::Entorno), None);
        assert_eq!(stats.get_or_zero(DomainTag::Entorno), DomainStats::default());
        assert_eq!(stats.overall(), DomainStats::new(3, 2));
    }

    #[test]
    fn percentage_guards_against_zero_total() {
        assert_eq!(DomainStats::new(0, 0).percentage(), 0.0);
        assert_eq!(DomainStats::new(4, 3).percentage(), 75.0);
    }
}
