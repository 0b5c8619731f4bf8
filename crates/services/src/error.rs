//! Shared error types for the services crate.

use gateway::GatewayError;
use thiserror::Error;

use crate::practice::QuizState;

/// Why a submission was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidSubmission {
    #[error("no answers recorded")]
    NoAnswers,
    #[error("option {index} does not exist ({len} options)")]
    OptionOutOfRange { index: usize, len: usize },
}

/// Errors emitted by the quiz flow.
///
/// Only `PersistFailed` is ever non-fatal: a finished practice still shows its
/// results and carries the error as a warning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("please log in to continue")]
    AuthRequired,
    #[error("authentication failed: {0}")]
    AuthFailed(GatewayError),
    #[error("could not load a question: {0}")]
    FetchFailed(GatewayError),
    #[error("could not save practice results: {0}")]
    PersistFailed(GatewayError),
    #[error(transparent)]
    InvalidSubmission(#[from] InvalidSubmission),
    #[error("this question was already answered")]
    AlreadyAnswered,
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: QuizState,
    },
    #[error("practice limit of {max} questions reached")]
    SessionLimitReached { max: usize },
    #[error("another request is still in progress")]
    Busy,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Errors emitted by `ChatService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChatError {
    #[error("please log in to chat")]
    AuthRequired,
    #[error("message is empty")]
    EmptyMessage,
    #[error("the assistant took too long to answer")]
    Timeout,
    #[error("the chat service is not available")]
    Unavailable,
    #[error("the message was not accepted")]
    InvalidRequest,
    #[error("chat request failed: {0}")]
    Failed(GatewayError),
}

impl From<GatewayError> for ChatError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::AuthRequired => ChatError::AuthRequired,
            GatewayError::Timeout => ChatError::Timeout,
            GatewayError::Status(404) => ChatError::Unavailable,
            GatewayError::Status(422) => ChatError::InvalidRequest,
            other => ChatError::Failed(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_errors_map_from_status_codes() {
        assert_eq!(ChatError::from(GatewayError::Status(404)), ChatError::Unavailable);
        assert_eq!(ChatError::from(GatewayError::Status(422)), ChatError::InvalidRequest);
        assert_eq!(ChatError::from(GatewayError::AuthRequired), ChatError::AuthRequired);
        assert_eq!(ChatError::from(GatewayError::Timeout), ChatError::Timeout);
        assert!(matches!(
            ChatError::from(GatewayError::Status(500)),
            ChatError::Failed(GatewayError::Status(500))
        ));
    }
}
