//! Historical statistics across persisted practice sessions.

use chrono::{DateTime, Utc};

use crate::model::{DomainStats, DomainTag, PracticeSession};

/// Totals and per-domain rollup over a user's practice history.
///
/// Built by [`ProgressReport::from_sessions`], a pure function of its input:
/// running it twice over the same slice gives the same report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub total_sessions: usize,
    pub total_questions: u32,
    pub total_correct: u32,
    pub average_score: f64,
    pub last_session_end: Option<DateTime<Utc>>,
    domains: [DomainStats; 3],
}

impl ProgressReport {
    #[must_use]
    pub fn from_sessions(sessions: &[PracticeSession]) -> Self {
        let mut domains = [DomainStats::default(); 3];
        for session in sessions {
            for tag in DomainTag::ALL {
                domains[tag.index()] = domains[tag.index()] + session.domain(tag);
            }
        }

        let overall = domains
            .iter()
            .fold(DomainStats::default(), |acc, stats| acc + *stats);

        Self {
            total_sessions: sessions.len(),
            total_questions: overall.total,
            total_correct: overall.correct,
            average_score: overall.percentage(),
            last_session_end: sessions.iter().map(PracticeSession::end_time).max(),
            domains,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_sessions(&[])
    }

    /// Rolled-up stats for one domain (zero-filled).
    #[must_use]
    pub fn domain(&self, tag: DomainTag) -> DomainStats {
        self.domains[tag.index()]
    }

    /// Every domain in display order, including ones never practiced.
    pub fn domains(&self) -> impl Iterator<Item = (DomainTag, DomainStats)> + '_ {
        DomainTag::ALL.into_iter().map(|tag| (tag, self.domain(tag)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn session(personas: (u32, u32), minutes: i64) -> PracticeSession {
        PracticeSession::from_persisted(
            None,
            UserId::new(1),
            fixed_now(),
            fixed_now() + Duration::minutes(minutes),
            DomainStats::new(personas.0, personas.1),
            DomainStats::default(),
            DomainStats::default(),
        )
        .unwrap()
    }

    #[test]
    fn rolls_up_domains_and_average() {
        let sessions = vec![session((3, 2), 10), session((1, 1), 20)];
        let report = ProgressReport::from_sessions(&sessions);

        assert_eq!(report.total_sessions, 2);
        assert_eq!(report.total_questions, 4);
        assert_eq!(report.total_correct, 3);
        assert_eq!(report.average_score, 75.0);
        assert_eq!(report.domain(DomainTag::Personas), DomainStats::new(4, 3));
        assert_eq!(report.domain(DomainTag::Proceso), DomainStats::default());
        assert_eq!(report.domain(DomainTag::Personas).percentage(), 75.0);
        assert_eq!(
            report.last_session_end,
            Some(fixed_now() + Duration::minutes(20))
        );
    }

    #[test]
    fn empty_history_reports_zero() {
        let report = ProgressReport::from_sessions(&[]);
        assert!(report.is_empty());
        assert_eq!(report.total_questions, 0);
        assert_eq!(report.average_score, 0.0);
        assert_eq!(report.last_session_end, None);
        assert_eq!(report.domains().count(), 3);
        assert_eq!(report, ProgressReport::empty());
    }

    #[test]
    fn aggregation_is_repeatable() {
        let sessions = vec![session((5, 4), 1), session((2, 0), 2)];
        assert_eq!(
            ProgressReport::from_sessions(&sessions),
            ProgressReport::from_sessions(&sessions)
        );
    }
}
