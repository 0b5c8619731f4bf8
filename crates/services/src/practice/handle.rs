use std::sync::Arc;

use pmp_core::model::{DomainSelection, Question, QuizSession, User};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::QuizError;
use crate::practice::{FinishOutcome, QuizController, QuizState, SubmitOutcome};

/// Shareable, single-flight access to a `QuizController`.
///
/// Practice events arriving while another one is still running are refused
/// with `QuizError::Busy` instead of being queued behind it.
#[derive(Clone)]
pub struct ControllerHandle {
    inner: Arc<Mutex<QuizController>>,
}

impl ControllerHandle {
    #[must_use]
    pub fn new(controller: QuizController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    fn try_acquire(&self) -> Result<MutexGuard<'_, QuizController>, QuizError> {
        self.inner.try_lock().map_err(|_| QuizError::Busy)
    }

    pub async fn state(&self) -> QuizState {
        self.inner.lock().await.state()
    }

    pub async fn current_question(&self) -> Option<Question> {
        self.inner.lock().await.current_question().cloned()
    }

    pub async fn session(&self) -> Option<QuizSession> {
        self.inner.lock().await.session().cloned()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.inner.lock().await.current_user()
    }

    /// # Errors
    ///
    /// See `QuizController::login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, QuizError> {
        self.inner.lock().await.login(email, password).await
    }

    /// # Errors
    ///
    /// See `QuizController::signup`.
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, QuizError> {
        self.inner.lock().await.signup(email, password).await
    }

    /// Waits for any running event, then logs out.
    pub async fn logout(&self) {
        self.inner.lock().await.logout();
    }

    pub async fn return_to_menu(&self) {
        self.inner.lock().await.return_to_menu();
    }

    /// # Errors
    ///
    /// `QuizError::Busy` while another event runs, otherwise see
    /// `QuizController::start_practice`.
    pub async fn start_practice(&self, selection: DomainSelection) -> Result<Question, QuizError> {
        let mut controller = self.try_acquire()?;
        let question = controller.start_practice(selection).await?;
        Ok(question.clone())
    }

    /// # Errors
    ///
    /// `QuizError::Busy` while another event runs, otherwise see
    /// `QuizController::next_question`.
    pub async fn next_question(&self, selection: DomainSelection) -> Result<Question, QuizError> {
        let mut controller = self.try_acquire()?;
        let question = controller.next_question(selection).await?;
        Ok(question.clone())
    }

    /// # Errors
    ///
    /// `QuizError::Busy` while another event runs, otherwise see
    /// `QuizController::submit_answer`.
    pub fn submit_answer(&self, selected_index: usize) -> Result<SubmitOutcome, QuizError> {
        self.try_acquire()?.submit_answer(selected_index)
    }

    /// # Errors
    ///
    /// `QuizError::Busy` while another event runs, otherwise see
    /// `QuizController::finish_practice`.
    pub async fn finish_practice(&self) -> Result<FinishOutcome, QuizError> {
        let mut controller = self.try_acquire()?;
        controller.finish_practice().await
    }
}
