mod domain;
mod practice;
mod question;
mod session;
mod user;

pub use domain::{DomainParseError, DomainSelection, DomainTag};
pub use practice::{PracticeSession, PracticeSessionError, UserId};
pub use question::{Letter, LetterError, Question, QuestionError, QuestionOption, is_answer_correct};
pub use session::{DomainStats, DomainStatsMap, QuizAnswer, QuizSession, overall_percentage};
pub use user::User;
