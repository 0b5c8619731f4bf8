use thiserror::Error;

use crate::model::{DomainParseError, LetterError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Letter(#[from] LetterError),
    #[error(transparent)]
    Domain(#[from] DomainParseError),
}
