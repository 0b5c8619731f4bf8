use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use pmp_core::Clock;
use pmp_core::model::{
    DomainSelection, PracticeSession, Question, QuizSession, User, UserId,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::port::{ChatRequest, GatewayError, QuizGateway};

mod wire;

use wire::{
    ChatResponse, ErrorBody, MeResponse, QuestionEnvelope, SessionPayload, SignupPayload,
    TokenResponse, session_from_value,
};

/// Connection settings for [`HttpGateway`].
#[derive(Clone, Debug)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

/// REST adapter for the quiz backend.
///
/// Owns the cached [`User`]; the token is attached as a bearer header to
/// every call after login.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    clock: Clock,
    user: RwLock<Option<User>>,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the HTTP client cannot be built.
    pub fn new(config: HttpGatewayConfig, clock: Clock) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            clock,
            user: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn set_user(&self, user: Option<User>) {
        match self.user.write() {
            Ok(mut guard) => *guard = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }

    fn token(&self) -> Result<String, GatewayError> {
        self.current_user()
            .filter(|u| u.is_authenticated)
            .map(|u| u.access_token)
            .ok_or(GatewayError::AuthRequired)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        Ok(builder.bearer_auth(self.token()?))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("backend rejected the access token; clearing identity");
            self.set_user(None);
            return Err(GatewayError::AuthRequired);
        }
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn fetch_me(&self, token: &str) -> Result<MeResponse, GatewayError> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status().as_u16()));
        }
        response.json().await.map_err(transport)
    }

    async fn try_fetch_history(&self, user_id: UserId) -> Result<Vec<PracticeSession>, GatewayError> {
        let request = self.authorized(
            self.client
                .get(self.url(&format!("/practice-sessions/user/{user_id}"))),
        )?;
        let records: Vec<serde_json::Value> =
            self.send(request).await?.json().await.map_err(transport)?;

        let mut sessions = Vec::with_capacity(records.len());
        for record in records {
            match session_from_value(record) {
                Ok(session) => sessions.push(session),
                Err(e) => warn!(error = %e, "skipping malformed practice session"),
            }
        }
        Ok(sessions)
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_decode() {
        GatewayError::Decode(e.to_string())
    } else {
        GatewayError::Transport(e.to_string())
    }
}

async fn rejection(response: Response) -> GatewayError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => GatewayError::Rejected(body.message()),
        Err(_) => GatewayError::Rejected(format!("status {}", status.as_u16())),
    }
}

#[async_trait]
impl QuizGateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> Result<User, GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            let err = rejection(response).await;
            warn!(error = %err, "login failed");
            return Err(err);
        }
        let token: TokenResponse = response.json().await.map_err(transport)?;

        let me = self.fetch_me(&token.access_token).await?;
        let user = User::authenticated(me.email, UserId::new(me.id), token.access_token);
        info!(user_id = %user.id, "logged in");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    async fn signup(&self, email: &str, password: &str) -> Result<User, GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/signup"))
            .json(&SignupPayload { email, password })
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            let err = rejection(response).await;
            warn!(error = %err, "signup failed");
            return Err(err);
        }
        debug!("account created, logging in");
        self.login(email, password).await
    }

    fn logout(&self) {
        self.set_user(None);
    }

    fn current_user(&self) -> Option<User> {
        match self.user.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn fetch_question(&self, domain: DomainSelection) -> Result<Question, GatewayError> {
        let tag = domain.resolve(&mut rand::rng());
        let request = self.authorized(
            self.client
                .get(self.url("/question"))
                .query(&[("domain", tag.as_str())]),
        )?;

        let result = async {
            let envelope: QuestionEnvelope =
                self.send(request).await?.json().await.map_err(transport)?;
            envelope.into_question()
        }
        .await;

        match &result {
            Ok(_) => debug!(domain = %tag, "question fetched"),
            Err(e) => warn!(domain = %tag, error = %e, "question fetch failed"),
        }
        result
    }

    async fn save_session(&self, session: &QuizSession) -> Result<PracticeSession, GatewayError> {
        let user = self.current_user().ok_or(GatewayError::AuthRequired)?;
        let record = PracticeSession::from_quiz_session(user.id, session, self.clock.now());
        let request = self.authorized(
            self.client
                .post(self.url("/practice-sessions"))
                .json(&SessionPayload::from_session(&record)),
        )?;

        match self.send(request).await {
            Ok(_) => {
                info!(answers = session.answered_count(), "practice session saved");
                Ok(record)
            }
            Err(e) => {
                warn!(error = %e, "practice session save failed");
                Err(e)
            }
        }
    }

    async fn fetch_history(&self, user_id: UserId) -> Vec<PracticeSession> {
        match self.try_fetch_history(user_id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(error = %e, %user_id, "history fetch failed");
                Vec::new()
            }
        }
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let builder = self.authorized(self.client.post(self.url("/chat/")).json(request))?;
        let body: ChatResponse = self.send(builder).await?.json().await.map_err(transport)?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpGateway>();
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new(
            HttpGatewayConfig::new("http://localhost:8000/api/", Duration::from_secs(1)),
            Clock::default(),
        )
        .unwrap();
        assert_eq!(gateway.url("/question"), "http://localhost:8000/api/question");
    }

    #[tokio::test]
    async fn calls_without_login_require_auth() {
        let gateway = HttpGateway::new(
            HttpGatewayConfig::new("http://127.0.0.1:9", Duration::from_millis(200)),
            Clock::default(),
        )
        .unwrap();
        assert_eq!(
            gateway.fetch_question(DomainSelection::Random).await.unwrap_err(),
            GatewayError::AuthRequired
        );
        let session = QuizSession::new(pmp_core::time::fixed_now());
        assert_eq!(
            gateway.save_session(&session).await.unwrap_err(),
            GatewayError::AuthRequired
        );
        assert!(gateway.fetch_history(UserId::new(1)).await.is_empty());
    }
}
