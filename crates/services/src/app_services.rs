use std::sync::Arc;

use gateway::{HttpGateway, HttpGatewayConfig, QuizGateway};

use crate::Clock;
use crate::chat_service::ChatService;
use crate::error::AppServicesError;
use crate::practice::{ControllerHandle, QuizController};
use crate::progress_service::ProgressService;

/// Assembles the app-facing services around one shared gateway.
#[derive(Clone)]
pub struct AppServices {
    gateway: Arc<dyn QuizGateway>,
    quiz: ControllerHandle,
    chat: Arc<ChatService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    #[must_use]
    pub fn new(gateway: Arc<dyn QuizGateway>, clock: Clock, max_questions: usize) -> Self {
        let controller =
            QuizController::new(Arc::clone(&gateway), clock).with_max_questions(max_questions);
        Self {
            quiz: ControllerHandle::new(controller),
            chat: Arc::new(ChatService::new(Arc::clone(&gateway))),
            progress: Arc::new(ProgressService::new(Arc::clone(&gateway))),
            gateway,
        }
    }

    /// Build services talking to the HTTP backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn http(
        config: HttpGatewayConfig,
        clock: Clock,
        max_questions: usize,
    ) -> Result<Self, AppServicesError> {
        let gateway: Arc<dyn QuizGateway> = Arc::new(HttpGateway::new(config, clock)?);
        Ok(Self::new(gateway, clock, max_questions))
    }

    /// Log out, dropping the unfinished practice session and the chat history.
    pub async fn logout(&self) {
        self.quiz.logout().await;
        self.chat.clear_history();
    }

    #[must_use]
    pub fn gateway(&self) -> Arc<dyn QuizGateway> {
        Arc::clone(&self.gateway)
    }

    #[must_use]
    pub fn quiz(&self) -> ControllerHandle {
        self.quiz.clone()
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
