use std::sync::Arc;

use gateway::{GatewayError, QuizGateway};
use pmp_core::Clock;
use pmp_core::model::{
    DomainSelection, DomainTag, Question, QuizAnswer, QuizSession, User, overall_percentage,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::{InvalidSubmission, QuizError};
use crate::practice::{FinishOutcome, QuizState, SubmitOutcome};

/// Default cap on answers recorded in a single practice session.
pub const DEFAULT_MAX_QUESTIONS: usize = 100;

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns the active practice session and drives it through `QuizState`.
///
/// All network access goes through the injected gateway. A failed call never
/// advances or corrupts the session; an expired identity drops it.
pub struct QuizController {
    gateway: Arc<dyn QuizGateway>,
    clock: Clock,
    rng: StdRng,
    max_questions: usize,
    state: QuizState,
    session: Option<QuizSession>,
    current: Option<Question>,
}

impl QuizController {
    #[must_use]
    pub fn new(gateway: Arc<dyn QuizGateway>, clock: Clock) -> Self {
        let state = if authenticated_user(gateway.as_ref()).is_some() {
            QuizState::Idle
        } else {
            QuizState::Unauthenticated
        };
        Self {
            gateway,
            clock,
            rng: StdRng::from_os_rng(),
            max_questions: DEFAULT_MAX_QUESTIONS,
            state,
            session: None,
            current: None,
        }
    }

    /// Use a deterministic generator for `Random` domain draws.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_max_questions(mut self, max_questions: usize) -> Self {
        self.max_questions = max_questions.max(1);
        self
    }

    // ─── accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// The question on screen, answered or not.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        authenticated_user(self.gateway.as_ref())
    }

    #[must_use]
    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    #[must_use]
    pub fn gateway(&self) -> Arc<dyn QuizGateway> {
        Arc::clone(&self.gateway)
    }

    // ─── authentication ────────────────────────────────────────────────────────

    /// Log in and land on the menu.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AuthFailed` when the backend refuses the credentials
    /// or cannot be reached. The controller stays `Unauthenticated`.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, QuizError> {
        self.drop_session();
        match self.gateway.login(email, password).await {
            Ok(user) => {
                info!(email = %user.email, "logged in");
                self.state = QuizState::Idle;
                Ok(user)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.state = QuizState::Unauthenticated;
                Err(QuizError::AuthFailed(err))
            }
        }
    }

    /// Register an account, then log in with it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AuthFailed` when registration or the follow-up
    /// login fails.
    pub async fn signup(&mut self, email: &str, password: &str) -> Result<User, QuizError> {
        self.drop_session();
        match self.gateway.signup(email, password).await {
            Ok(user) => {
                info!(email = %user.email, "signed up");
                self.state = QuizState::Idle;
                Ok(user)
            }
            Err(err) => {
                warn!(error = %err, "signup failed");
                self.state = QuizState::Unauthenticated;
                Err(QuizError::AuthFailed(err))
            }
        }
    }

    /// Forget the identity and any unfinished session. Nothing is saved.
    pub fn logout(&mut self) {
        if let Some(session) = &self.session {
            debug!(answers = session.answered_count(), "discarding unfinished session");
        }
        self.gateway.logout();
        self.drop_session();
        self.state = QuizState::Unauthenticated;
    }

    // ─── practice flow ─────────────────────────────────────────────────────────

    /// Open a new practice session with a first question.
    ///
    /// The session only exists once a question was fetched; a failed fetch
    /// leaves the controller where it was.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` when no valid identity is cached.
    /// - `InvalidState` when a practice is already running.
    /// - `FetchFailed` when no question could be loaded.
    pub async fn start_practice(&mut self, selection: DomainSelection) -> Result<&Question, QuizError> {
        if self.state.in_practice() {
            return Err(self.invalid("start a practice"));
        }
        self.ensure_authenticated()?;

        let start_time = self.clock.now();
        let question = self.fetch(selection).await?;
        self.session = Some(QuizSession::new(start_time));
        Ok(self.show(question))
    }

    /// Load the next question of the running session.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the current question was answered.
    /// - `SessionLimitReached` once the session holds the maximum number of answers.
    /// - `AuthRequired` / `FetchFailed` as for `start_practice`.
    pub async fn next_question(&mut self, selection: DomainSelection) -> Result<&Question, QuizError> {
        if self.state != QuizState::AnswerRevealed {
            return Err(self.invalid("load the next question"));
        }
        let answered = self.session.as_ref().map_or(0, QuizSession::answered_count);
        if answered >= self.max_questions {
            return Err(QuizError::SessionLimitReached {
                max: self.max_questions,
            });
        }
        self.ensure_authenticated()?;

        let question = self.fetch(selection).await?;
        Ok(self.show(question))
    }

    /// Record the answer for the question on screen.
    ///
    /// # Errors
    ///
    /// - `AlreadyAnswered` when the question was already submitted.
    /// - `InvalidState` when no question is waiting for an answer.
    /// - `InvalidSubmission` when `selected_index` is not one of the options.
    pub fn submit_answer(&mut self, selected_index: usize) -> Result<SubmitOutcome, QuizError> {
        match self.state {
            QuizState::AwaitingAnswer => {}
            QuizState::AnswerRevealed => return Err(QuizError::AlreadyAnswered),
            _ => return Err(self.invalid("submit an answer")),
        }
        let (Some(question), Some(session)) = (self.current.as_ref(), self.session.as_mut()) else {
            return Err(QuizError::Unexpected(
                "awaiting an answer without an active question".into(),
            ));
        };

        let len = question.options().len();
        let answer = QuizAnswer::from_submission(question, selected_index)
            .map_err(|_| InvalidSubmission::OptionOutOfRange {
                index: selected_index,
                len,
            })?;
        let outcome = SubmitOutcome {
            question: question.clone(),
            selected: answer.selected_option(),
            correct_option: answer.correct_option(),
            is_correct: answer.is_correct(),
            explanation: question.explanation().to_string(),
            answered: session.answered_count() + 1,
        };
        debug!(
            domain = %answer.domain(),
            correct = answer.is_correct(),
            "answer recorded"
        );
        session.add_answer(answer);
        self.state = QuizState::AnswerRevealed;
        Ok(outcome)
    }

    /// Close the session, save it, and hand back its results.
    ///
    /// Results are returned even when saving fails; the failure is carried in
    /// `FinishOutcome::warning`.
    ///
    /// # Errors
    ///
    /// - `InvalidSubmission(NoAnswers)` when nothing was answered; no backend call is made.
    /// - `InvalidState` while the question on screen is still unanswered.
    /// - `AuthRequired` when the identity expired before saving; the session is dropped.
    pub async fn finish_practice(&mut self) -> Result<FinishOutcome, QuizError> {
        if self.session.as_ref().is_none_or(QuizSession::is_empty) {
            return Err(InvalidSubmission::NoAnswers.into());
        }
        if self.state != QuizState::AnswerRevealed {
            return Err(self.invalid("finish the practice"));
        }
        self.ensure_authenticated()?;

        let Some(session) = self.session.take() else {
            return Err(InvalidSubmission::NoAnswers.into());
        };
        self.current = None;

        let stats = session.stats_by_domain();
        let percentage = overall_percentage(&stats);
        let (saved, warning) = match self.gateway.save_session(&session).await {
            Ok(saved) => {
                info!(
                    answers = session.answered_count(),
                    percentage, "practice session saved"
                );
                (Some(saved), None)
            }
            Err(err) => {
                warn!(error = %err, "practice session not saved");
                (None, Some(QuizError::PersistFailed(err)))
            }
        };

        self.state = if authenticated_user(self.gateway.as_ref()).is_some() {
            QuizState::Finished
        } else {
            QuizState::Unauthenticated
        };
        Ok(FinishOutcome {
            session,
            stats,
            overall_percentage: percentage,
            saved,
            warning,
        })
    }

    /// Leave the practice flow. An unfinished session is dropped, not saved.
    pub fn return_to_menu(&mut self) {
        self.drop_session();
        if self.state != QuizState::Unauthenticated {
            self.state = QuizState::Idle;
        }
    }

    // ─── internals ─────────────────────────────────────────────────────────────

    /// Check the cached identity, dropping back to `Unauthenticated` when it is gone.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AuthRequired` when no authenticated user is cached.
    pub fn ensure_authenticated(&mut self) -> Result<User, QuizError> {
        match authenticated_user(self.gateway.as_ref()) {
            Some(user) => Ok(user),
            None => {
                self.expire();
                Err(QuizError::AuthRequired)
            }
        }
    }

    async fn fetch(&mut self, selection: DomainSelection) -> Result<Question, QuizError> {
        let domain: DomainTag = selection.resolve(&mut self.rng);
        debug!(%selection, %domain, "fetching question");
        match self.gateway.fetch_question(DomainSelection::Concrete(domain)).await {
            Ok(question) => Ok(question),
            Err(GatewayError::AuthRequired) => {
                self.expire();
                Err(QuizError::AuthRequired)
            }
            Err(err) => {
                warn!(%domain, error = %err, "question fetch failed");
                Err(QuizError::FetchFailed(err))
            }
        }
    }

    fn show(&mut self, question: Question) -> &Question {
        self.state = QuizState::AwaitingAnswer;
        self.current.insert(question)
    }

    fn expire(&mut self) {
        if self.state != QuizState::Unauthenticated {
            info!("authentication missing or expired");
        }
        self.drop_session();
        self.state = QuizState::Unauthenticated;
    }

    fn drop_session(&mut self) {
        self.session = None;
        self.current = None;
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidState {
            action,
            state: self.state,
        }
    }
}

fn authenticated_user(gateway: &dyn QuizGateway) -> Option<User> {
    gateway.current_user().filter(|user| user.is_authenticated)
}
