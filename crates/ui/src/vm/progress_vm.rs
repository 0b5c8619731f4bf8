use pmp_core::ProgressReport;
use pmp_core::model::DomainTag;

use crate::vm::time_fmt::{format_datetime, format_percentage};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressDomainVm {
    pub label: &'static str,
    pub correct: u32,
    pub total: u32,
    pub percentage_str: String,
}

/// Lifetime statistics. Every domain gets a row, practiced or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub total_sessions: usize,
    pub total_questions: u32,
    pub total_correct: u32,
    pub average_str: String,
    pub last_session_str: Option<String>,
    pub domains: Vec<ProgressDomainVm>,
}

impl ProgressVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

impl From<&ProgressReport> for ProgressVm {
    fn from(report: &ProgressReport) -> Self {
        let domains = DomainTag::ALL
            .iter()
            .map(|&tag| {
                let stats = report.domain(tag);
                ProgressDomainVm {
                    label: tag.label(),
                    correct: stats.correct,
                    total: stats.total,
                    percentage_str: format_percentage(stats.percentage()),
                }
            })
            .collect();
        Self {
            total_sessions: report.total_sessions,
            total_questions: report.total_questions,
            total_correct: report.total_correct,
            average_str: format_percentage(report.average_score),
            last_session_str: report.last_session_end.map(format_datetime),
            domains,
        }
    }
}
