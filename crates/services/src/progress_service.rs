use std::sync::Arc;

use gateway::QuizGateway;
use pmp_core::ProgressReport;
use tracing::debug;

use crate::error::QuizError;

/// Builds the progress report for the logged-in user.
pub struct ProgressService {
    gateway: Arc<dyn QuizGateway>,
}

impl ProgressService {
    #[must_use]
    pub fn new(gateway: Arc<dyn QuizGateway>) -> Self {
        Self { gateway }
    }

    /// Load the user's history and aggregate it.
    ///
    /// A history that cannot be fetched counts as empty.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AuthRequired` when nobody is logged in.
    pub async fn load(&self) -> Result<ProgressReport, QuizError> {
        let user = self
            .gateway
            .current_user()
            .filter(|user| user.is_authenticated)
            .ok_or(QuizError::AuthRequired)?;
        let sessions = self.gateway.fetch_history(user.id).await;
        debug!(sessions = sessions.len(), user = %user.id, "history loaded");
        Ok(ProgressReport::from_sessions(&sessions))
    }
}
