use std::sync::{Arc, Mutex, MutexGuard};

use gateway::{ChatMessage, ChatRequest, QuizGateway};
use pmp_core::model::UserId;
use tracing::{debug, warn};

use crate::error::ChatError;

pub const CHAT_MAX_TOKENS: u32 = 4096;
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// A PMBOK principle a chat can be scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principle {
    pub number: u8,
    pub title: String,
    pub description: String,
}

impl Principle {
    #[must_use]
    pub fn new(number: u8, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Messages exchanged by one user.
#[derive(Default)]
struct Conversation {
    owner: Option<UserId>,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Messages visible to `user`; anything left by another user is dropped.
    fn for_user(&mut self, user: UserId) -> &mut Vec<ChatMessage> {
        if self.owner != Some(user) {
            self.owner = Some(user);
            self.messages.clear();
        }
        &mut self.messages
    }
}

/// Conversation with the study assistant.
///
/// History only grows after a successful reply, so a failed exchange can be
/// retried without leaving a dangling user turn behind. It belongs to the user
/// who wrote it and is never sent on behalf of anyone else.
pub struct ChatService {
    gateway: Arc<dyn QuizGateway>,
    history: Mutex<Conversation>,
}

impl ChatService {
    #[must_use]
    pub fn new(gateway: Arc<dyn QuizGateway>) -> Self {
        Self {
            gateway,
            history: Mutex::new(Conversation::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn authenticated_user(&self) -> Option<UserId> {
        self.gateway
            .current_user()
            .filter(|user| user.is_authenticated)
            .map(|user| user.id)
    }

    /// History of the logged-in user; empty when nobody is logged in.
    #[must_use]
    pub fn history(&self) -> Vec<ChatMessage> {
        match self.authenticated_user() {
            Some(user) => self.lock().for_user(user).clone(),
            None => Vec::new(),
        }
    }

    pub fn clear_history(&self) {
        let mut conversation = self.lock();
        conversation.owner = None;
        conversation.messages.clear();
    }

    /// Send a message with the conversation so far.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` for blank input, `AuthRequired` when no
    /// user is logged in, and the mapped gateway failure otherwise.
    pub async fn send_message(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let user = self.authenticated_user().ok_or(ChatError::AuthRequired)?;

        let request = ChatRequest {
            message: message.to_string(),
            message_history: self.lock().for_user(user).clone(),
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };
        debug!(history = request.message_history.len(), "sending chat message");
        let reply = self.gateway.chat(&request).await.map_err(|err| {
            warn!(error = %err, "chat request failed");
            ChatError::from(err)
        })?;

        let mut conversation = self.lock();
        let history = conversation.for_user(user);
        history.push(ChatMessage::user(request.message));
        history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Ask a question framed by one principle.
    ///
    /// # Errors
    ///
    /// Same as [`ChatService::send_message`].
    pub async fn ask_about_principle(
        &self,
        principle: &Principle,
        question: &str,
    ) -> Result<String, ChatError> {
        if question.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let message = format!(
            "Context: {}\n\nUser question: {}",
            principle_context(principle),
            question.trim()
        );
        self.send_message(&message).await
    }
}

fn principle_context(principle: &Principle) -> String {
    format!(
        "We are discussing Principle {} of PMBOK 7: {}. {} \
         Keep answers focused on this principle and how it is applied.",
        principle.number, principle.title, principle.description
    )
}

/// Greeting shown when a principle chat opens.
#[must_use]
pub fn welcome_message(principle: &Principle) -> String {
    format!(
        "Welcome to the chat about Principle {}!\n\n{}\n\n{}\n\n\
         Ask me about how it is applied, practical examples, or anything else \
         about this topic.",
        principle.number, principle.title, principle.description
    )
}
