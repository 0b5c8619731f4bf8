//! The practice flow: one active session driven through `QuizState`.

mod controller;
mod handle;
mod outcome;
mod state;

pub use controller::{DEFAULT_MAX_QUESTIONS, QuizController};
pub use handle::ControllerHandle;
pub use outcome::{FinishOutcome, SubmitOutcome};
pub use state::QuizState;
