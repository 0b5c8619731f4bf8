use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DomainStats, DomainTag, QuizSession};

/// Backend identifier of a user account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeSessionError {
    #[error("{domain}: correct ({correct}) exceeds total ({total})")]
    CorrectExceedsTotal {
        domain: DomainTag,
        total: u32,
        correct: u32,
    },
}

/// Persisted summary of a finished practice run.
///
/// Per-domain results are flattened into fixed counters; a domain that was
/// never answered is stored as `0/0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    id: Option<i64>,
    user_id: UserId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    personas: DomainStats,
    proceso: DomainStats,
    entorno: DomainStats,
}

impl PracticeSession {
    /// Flatten a finished in-memory session.
    #[must_use]
    pub fn from_quiz_session(
        user_id: UserId,
        session: &QuizSession,
        end_time: DateTime<Utc>,
    ) -> Self {
        let stats = session.stats_by_domain();
        Self {
            id: None,
            user_id,
            start_time: session.start_time(),
            end_time,
            personas: stats.get_or_zero(DomainTag::Personas),
            proceso: stats.get_or_zero(DomainTag::Proceso),
            entorno: stats.get_or_zero(DomainTag::Entorno),
        }
    }

    /// Rehydrate a session record returned by the backend.
    ///
    /// # Errors
    ///
    /// Returns `PracticeSessionError::CorrectExceedsTotal` if a domain reports
    /// more correct answers than questions.
    pub fn from_persisted(
        id: Option<i64>,
        user_id: UserId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        personas: DomainStats,
        proceso: DomainStats,
        entorno: DomainStats,
    ) -> Result<Self, PracticeSessionError> {
        for (domain, stats) in [
            (DomainTag::Personas, personas),
            (DomainTag::Proceso, proceso),
            (DomainTag::Entorno, entorno),
        ] {
            if stats.correct > stats.total {
                return Err(PracticeSessionError::CorrectExceedsTotal {
                    domain,
                    total: stats.total,
                    correct: stats.correct,
                });
            }
        }

        Ok(Self {
            id,
            user_id,
            start_time,
            end_time,
            personas,
            proceso,
            entorno,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    #[must_use]
    pub fn domain(&self, tag: DomainTag) -> DomainStats {
        match tag {
            DomainTag::Personas => self.personas,
            DomainTag::Proceso => self.proceso,
            DomainTag::Entorno => self.entorno,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        DomainTag::ALL
            .into_iter()
            .map(|tag| self.domain(tag).total)
            .fold(0, u32::saturating_add)
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        DomainTag::ALL
            .into_iter()
            .map(|tag| self.domain(tag).correct)
            .fold(0, u32::saturating_add)
    }
}
