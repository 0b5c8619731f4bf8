use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pmp_core::Clock;
use pmp_core::model::{
    DomainSelection, DomainTag, PracticeSession, Question, QuizSession, User, UserId,
};

use crate::port::{ChatRequest, GatewayError, QuizGateway};

#[derive(Default)]
struct State {
    accounts: Vec<(String, String, UserId)>,
    user: Option<User>,
    questions: VecDeque<Question>,
    fetch_failures: VecDeque<GatewayError>,
    save_failure: Option<GatewayError>,
    chat_replies: VecDeque<Result<String, GatewayError>>,
    requested_domains: Vec<DomainTag>,
    saved: Vec<PracticeSession>,
    chat_requests: Vec<ChatRequest>,
    next_user_id: i64,
    next_session_id: i64,
}

/// Scriptable in-memory backend for tests and offline runs.
///
/// Questions are served in the order they were queued. Each one is returned
/// with its domain replaced by the requested one so callers see the domain
/// they asked for.
#[derive(Clone)]
pub struct InMemoryGateway {
    clock: Clock,
    state: Arc<Mutex<State>>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(State {
                next_user_id: 1,
                next_session_id: 1,
                ..State::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register an account that `login` will accept.
    #[must_use]
    pub fn with_account(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.lock();
            let id = UserId::new(state.next_user_id);
            state.next_user_id += 1;
            state
                .accounts
                .push((email.to_string(), password.to_string(), id));
        }
        self
    }

    pub fn push_question(&self, question: Question) {
        self.lock().questions.push_back(question);
    }

    /// Make the next `fetch_question` fail with `error`.
    pub fn fail_next_fetch(&self, error: GatewayError) {
        self.lock().fetch_failures.push_back(error);
    }

    /// Make every `save_session` fail with `error` until cleared with `None`.
    pub fn set_save_failure(&self, error: Option<GatewayError>) {
        self.lock().save_failure = error;
    }

    pub fn push_chat_reply(&self, reply: Result<String, GatewayError>) {
        self.lock().chat_replies.push_back(reply);
    }

    /// Simulate the backend expiring the current token.
    pub fn expire_token(&self) {
        if let Some(user) = self.lock().user.as_mut() {
            user.is_authenticated = false;
        }
    }

    /// Insert a history record directly.
    pub fn insert_history(&self, session: PracticeSession) {
        self.lock().saved.push(session);
    }

    #[must_use]
    pub fn requested_domains(&self) -> Vec<DomainTag> {
        self.lock().requested_domains.clone()
    }

    #[must_use]
    pub fn saved_sessions(&self) -> Vec<PracticeSession> {
        self.lock().saved.clone()
    }

    #[must_use]
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.lock().chat_requests.clone()
    }

    fn require_user(state: &mut State) -> Result<User, GatewayError> {
        match state.user.clone() {
            Some(user) if user.is_authenticated => Ok(user),
            _ => {
                state.user = None;
                Err(GatewayError::AuthRequired)
            }
        }
    }
}

#[async_trait]
impl QuizGateway for InMemoryGateway {
    async fn login(&self, email: &str, password: &str) -> Result<User, GatewayError> {
        let mut state = self.lock();
        let Some((_, _, id)) = state
            .accounts
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .cloned()
        else {
            return Err(GatewayError::Rejected("Incorrect email or password".into()));
        };
        let user = User::authenticated(email, id, format!("token-{id}"));
        state.user = Some(user.clone());
        Ok(user)
    }

    async fn signup(&self, email: &str, password: &str) -> Result<User, GatewayError> {
        {
            let mut state = self.lock();
            if state.accounts.iter().any(|(e, _, _)| e == email) {
                return Err(GatewayError::Rejected("Email already registered".into()));
            }
            let id = UserId::new(state.next_user_id);
            state.next_user_id += 1;
            state
                .accounts
                .push((email.to_string(), password.to_string(), id));
        }
        self.login(email, password).await
    }

    fn logout(&self) {
        self.lock().user = None;
    }

    fn current_user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    async fn fetch_question(&self, domain: DomainSelection) -> Result<Question, GatewayError> {
        let tag = domain.resolve(&mut rand::rng());
        let mut state = self.lock();
        Self::require_user(&mut state)?;
        state.requested_domains.push(tag);
        if let Some(error) = state.fetch_failures.pop_front() {
            return Err(error);
        }
        let question = state.questions.pop_front().ok_or(GatewayError::NoQuestion)?;
        Question::new(
            question.question_text(),
            question.options().to_vec(),
            question.explanation(),
            tag,
        )
        .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn save_session(&self, session: &QuizSession) -> Result<PracticeSession, GatewayError> {
        let mut state = self.lock();
        let user = Self::require_user(&mut state)?;
        if let Some(error) = state.save_failure.clone() {
            return Err(error);
        }
        let record = PracticeSession::from_quiz_session(user.id, session, self.clock.now());
        let id = state.next_session_id;
        state.next_session_id += 1;
        let stored = PracticeSession::from_persisted(
            Some(id),
            record.user_id(),
            record.start_time(),
            record.end_time(),
            record.domain(DomainTag::Personas),
            record.domain(DomainTag::Proceso),
            record.domain(DomainTag::Entorno),
        )
        .map_err(|e| GatewayError::Decode(e.to_string()))?;
        state.saved.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_history(&self, user_id: UserId) -> Vec<PracticeSession> {
        let mut state = self.lock();
        if Self::require_user(&mut state).is_err() {
            return Vec::new();
        }
        state
            .saved
            .iter()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let mut state = self.lock();
        Self::require_user(&mut state)?;
        state.chat_requests.push(request.clone());
        state
            .chat_replies
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {}", request.message)))
    }
}
