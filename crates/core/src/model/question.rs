use std::fmt;

use thiserror::Error;

use crate::model::DomainTag;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,
    #[error("a question needs at least {min} options, got {len}")]
    TooFewOptions { min: usize, len: usize },
    #[error("a question can have at most {max} options, got {len}")]
    TooManyOptions { max: usize, len: usize },
    #[error("no option is marked correct")]
    NoCorrectOption,
    #[error("{count} options are marked correct")]
    MultipleCorrectOptions { count: usize },
    #[error("option index {index} is out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LetterError {
    #[error("option index {0} has no letter (max 25)")]
    IndexTooLarge(usize),
    #[error("'{0}' is not an option letter")]
    NotALetter(char),
}

//
// ─── LETTER ────────────────────────────────────────────────────────────────────
//

/// Option label shown to the user: index `0` is `A`, `1` is `B`, up to `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(u8);

impl Letter {
    /// Highest index that has a letter.
    pub const MAX_INDEX: usize = 25;

    /// # Errors
    ///
    /// Returns `LetterError::IndexTooLarge` for indices above 25.
    pub fn from_index(index: usize) -> Result<Self, LetterError> {
        if index > Self::MAX_INDEX {
            return Err(LetterError::IndexTooLarge(index));
        }
        let offset = u8::try_from(index).map_err(|_| LetterError::IndexTooLarge(index))?;
        Ok(Self(offset))
    }

    /// Parse a letter typed by the user (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `LetterError::NotALetter` for anything outside `A..=Z`.
    pub fn from_char(c: char) -> Result<Self, LetterError> {
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return Err(LetterError::NotALetter(c));
        }
        Ok(Self(upper as u8 - b'A'))
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One answer choice of a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

impl QuestionOption {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A multiple-choice practice question.
///
/// Always has between 2 and 26 options with exactly one marked correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    question_text: String,
    options: Vec<QuestionOption>,
    explanation: String,
    domain: DomainTag,
}

impl Question {
    pub const MIN_OPTIONS: usize = 2;
    pub const MAX_OPTIONS: usize = Letter::MAX_INDEX + 1;

    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, the option count is out of
    /// range, or the number of correct options is not exactly one.
    pub fn new(
        question_text: impl Into<String>,
        options: Vec<QuestionOption>,
        explanation: impl Into<String>,
        domain: DomainTag,
    ) -> Result<Self, QuestionError> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < Self::MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                min: Self::MIN_OPTIONS,
                len: options.len(),
            });
        }
        if options.len() > Self::MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions {
                max: Self::MAX_OPTIONS,
                len: options.len(),
            });
        }
        match options.iter().filter(|o| o.is_correct).count() {
            0 => return Err(QuestionError::NoCorrectOption),
            1 => {}
            count => return Err(QuestionError::MultipleCorrectOptions { count }),
        }

        Ok(Self {
            question_text,
            options,
            explanation: explanation.into(),
            domain,
        })
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn domain(&self) -> DomainTag {
        self.domain
    }

    /// Index of the single correct option.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        // Construction guarantees exactly one correct option.
        self.options
            .iter()
            .position(|o| o.is_correct)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn correct_letter(&self) -> Letter {
        // Index is below MAX_OPTIONS, so a letter always exists.
        Letter::from_index(self.correct_index()).unwrap_or(Letter(0))
    }

    /// Letter for the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::IndexOutOfRange` if the index has no option.
    pub fn letter_for(&self, index: usize) -> Result<Letter, QuestionError> {
        self.check_index(index)?;
        Letter::from_index(index).map_err(|_| QuestionError::IndexOutOfRange {
            index,
            len: self.options.len(),
        })
    }

    fn check_index(&self, index: usize) -> Result<(), QuestionError> {
        if index >= self.options.len() {
            return Err(QuestionError::IndexOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        Ok(())
    }
}

/// Whether the option at `selected_index` is the correct one.
///
/// # Errors
///
/// Returns `QuestionError::IndexOutOfRange` if `selected_index` is not in
/// `0..question.options().len()`.
pub fn is_answer_correct(question: &Question, selected_index: usize) -> Result<bool, QuestionError> {
    question.check_index(selected_index)?;
    Ok(question.options[selected_index].is_correct)
}
