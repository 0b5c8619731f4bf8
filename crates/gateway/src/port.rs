use async_trait::async_trait;
use pmp_core::model::{DomainSelection, PracticeSession, Question, QuizSession, User, UserId};
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced by gateway adapters.
///
/// Transport and parsing errors are converted into these variants at the
/// adapter boundary; callers never see a raw HTTP client error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("authentication required")]
    AuthRequired,

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("backend returned no question")]
    NoQuestion,

    #[error("request rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::AuthRequired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_history: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Contract between the quiz services and the remote backend.
///
/// Implementations own the authenticated identity. Any call that finds the
/// token missing or rejected clears that identity and returns
/// `GatewayError::AuthRequired`.
#[async_trait]
pub trait QuizGateway: Send + Sync {
    /// Exchange credentials for a token and cache the resulting user.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` for bad credentials, or transport errors.
    async fn login(&self, email: &str, password: &str) -> Result<User, GatewayError>;

    /// Register a new account, then log in with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` if the backend refuses the account.
    async fn signup(&self, email: &str, password: &str) -> Result<User, GatewayError>;

    /// Forget the cached identity. Does not contact the backend.
    fn logout(&self);

    fn current_user(&self) -> Option<User>;

    /// Fetch one question. `Random` is resolved to a concrete domain first.
    ///
    /// # Errors
    ///
    /// Every failure (network, status, malformed or empty payload) is an `Err`.
    async fn fetch_question(&self, domain: DomainSelection) -> Result<Question, GatewayError>;

    /// Persist a finished session for the current user, stamped with the end time.
    ///
    /// # Errors
    ///
    /// Returns an error unless the backend confirmed the save.
    async fn save_session(&self, session: &QuizSession) -> Result<PracticeSession, GatewayError>;

    /// All persisted sessions of a user. Empty on any failure.
    async fn fetch_history(&self, user_id: UserId) -> Vec<PracticeSession>;

    /// Send a chat message and return the assistant's reply.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on auth, status, or transport failures.
    async fn chat(&self, request: &ChatRequest) -> Result<String, GatewayError>;
}
