#![forbid(unsafe_code)]

pub mod app_services;
pub mod chat_service;
pub mod error;
pub mod practice;
pub mod progress_service;

pub use pmp_core::Clock;

pub use app_services::AppServices;
pub use chat_service::{ChatService, Principle, welcome_message};
pub use error::{AppServicesError, ChatError, InvalidSubmission, QuizError};
pub use practice::{
    ControllerHandle, DEFAULT_MAX_QUESTIONS, FinishOutcome, QuizController, QuizState,
    SubmitOutcome,
};
pub use progress_service::ProgressService;
