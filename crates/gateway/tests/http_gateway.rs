use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gateway::{ChatMessage, ChatRequest, GatewayError, HttpGateway, HttpGatewayConfig, QuizGateway};
use pmp_core::model::{DomainSelection, DomainStats, DomainTag, QuizAnswer, QuizSession, UserId};
use pmp_core::time::{fixed_clock, fixed_now};
use serde_json::{Value, json};

const TOKEN: &str = "tok-123";

#[derive(Default)]
struct Backend {
    expired: AtomicBool,
    domains: Mutex<Vec<String>>,
    saved: Mutex<Vec<Value>>,
    chats: Mutex<Vec<Value>>,
}

fn authorized(headers: &HeaderMap, backend: &Backend) -> bool {
    let expected = format!("Bearer {TOKEN}");
    !backend.expired.load(Ordering::SeqCst)
        && headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("username").map(String::as_str) == Some("pm@example.com")
        && form.get("password").map(String::as_str) == Some("secret")
    {
        Json(json!({"access_token": TOKEN, "token_type": "bearer"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response()
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    if body["email"] == "pm@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        )
            .into_response();
    }
    Json(json!({"email": body["email"], "id": 99})).into_response()
}

async fn me(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !authorized(&headers, &backend) {
        return unauthorized();
    }
    Json(json!({"email": "pm@example.com", "id": 7})).into_response()
}

async fn question(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers, &backend) {
        return unauthorized();
    }
    let domain = query.get("domain").cloned().unwrap_or_default();
    backend.domains.lock().unwrap().push(domain.clone());
    if domain == "entorno" {
        return Json(json!({"success": false, "data": null})).into_response();
    }
    Json(json!({
        "success": true,
        "data": {
            "question_text": "Which document authorizes the project?",
            "options": [
                {"text": "Scope statement", "is_correct": false},
                {"text": "Project charter", "is_correct": true},
                {"text": "Risk register", "is_correct": false}
            ],
            "explanation": "The charter formally authorizes the project.",
            "domain": domain
        }
    }))
    .into_response()
}

async fn save_session(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers, &backend) {
        return unauthorized();
    }
    backend.saved.lock().unwrap().push(body);
    Json(json!({"ok": true})).into_response()
}

async fn history(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Response {
    if !authorized(&headers, &backend) {
        return unauthorized();
    }
    Json(json!([
        {
            "id": 1, "user_id": user_id,
            "start_time": "2024-05-01T10:00:00", "end_time": "2024-05-01T10:10:00",
            "personas_total": 3, "personas_correct": 2,
            "proceso_total": 0, "proceso_correct": 0,
            "entorno_total": 0, "entorno_correct": 0
        },
        {
            "id": 2, "user_id": user_id,
            "start_time": "2024-05-02T10:00:00Z", "end_time": "2024-05-02T10:10:00Z",
            "personas_total": 1, "personas_correct": 5
        },
        {
            "id": 3, "user_id": user_id,
            "start_time": "not-a-date", "end_time": "2024-05-03T10:10:00Z",
            "personas_total": 4, "personas_correct": 4
        },
        {
            "id": 4, "user_id": user_id,
            "start_time": "2024-05-04T10:00:00Z", "end_time": "2024-05-04T10:10:00Z",
            "personas_total": null, "personas_correct": null,
            "entorno_total": 2, "entorno_correct": 1
        }
    ]))
    .into_response()
}

async fn chat(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers, &backend) {
        return unauthorized();
    }
    backend.chats.lock().unwrap().push(body.clone());
    Json(json!({"response": format!("You asked: {}", body["message"].as_str().unwrap_or(""))}))
        .into_response()
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/auth/token", post(token))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/me", get(me))
        .route("/api/question", get(question))
        .route("/api/practice-sessions", post(save_session))
        .route("/api/practice-sessions/user/{id}", get(history))
        .route("/api/chat/", post(chat))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(
        HttpGatewayConfig::new(base_url, Duration::from_secs(5)),
        fixed_clock(),
    )
    .unwrap()
}

#[tokio::test]
async fn login_caches_identity_from_me_endpoint() {
    let (url, _backend) = spawn_backend().await;
    let gateway = gateway(&url);

    let user = gateway.login("pm@example.com", "secret").await.unwrap();
    assert_eq!(user.id, UserId::new(7));
    assert_eq!(user.email, "pm@example.com");
    assert!(user.is_authenticated);
    assert_eq!(gateway.current_user(), Some(user));

    gateway.logout();
    assert_eq!(gateway.current_user(), None);
}

#[tokio::test]
async fn bad_credentials_are_rejected_with_backend_detail() {
    let (url, _backend) = spawn_backend().await;
    let gateway = gateway(&url);

    let err = gateway.login("pm@example.com", "nope").await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Rejected("Incorrect email or password".into())
    );
    assert_eq!(gateway.current_user(), None);

    let err = gateway.signup("pm@example.com", "secret").await.unwrap_err();
    assert_eq!(err, GatewayError::Rejected("Email already registered".into()));
}

#[tokio::test]
async fn fetches_question_for_requested_domain() {
    let (url, backend) = spawn_backend().await;
    let gateway = gateway(&url);
    gateway.login("pm@example.com", "secret").await.unwrap();

    let question = gateway
        .fetch_question(DomainSelection::Concrete(DomainTag::Personas))
        .await
        .unwrap();
    assert_eq!(question.domain(), DomainTag::Personas);
    assert_eq!(question.correct_index(), 1);

    gateway.fetch_question(DomainSelection::Random).await.ok();
    let domains = backend.domains.lock().unwrap().clone();
    assert_eq!(domains.len(), 2);
    assert_eq!(domains[0], "personas");
    assert!(["personas", "proceso", "entorno"].contains(&domains[1].as_str()));
}

#[tokio::test]
async fn unsuccessful_question_payload_is_an_error() {
    let (url, _backend) = spawn_backend().await;
    let gateway = gateway(&url);
    gateway.login("pm@example.com", "secret").await.unwrap();

    let err = gateway
        .fetch_question(DomainSelection::Concrete(DomainTag::Entorno))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::NoQuestion);
}

#[tokio::test]
async fn expired_token_clears_identity() {
    let (url, backend) = spawn_backend().await;
    let gateway = gateway(&url);
    gateway.login("pm@example.com", "secret").await.unwrap();
    backend.expired.store(true, Ordering::SeqCst);

    let err = gateway
        .fetch_question(DomainSelection::Concrete(DomainTag::Proceso))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::AuthRequired);
    assert_eq!(gateway.current_user(), None);
}

#[tokio::test]
async fn save_session_posts_flattened_counters() {
    let (url, backend) = spawn_backend().await;
    let gateway = gateway(&url);
    gateway.login("pm@example.com", "secret").await.unwrap();

    let question = gateway
        .fetch_question(DomainSelection::Concrete(DomainTag::Proceso))
        .await
        .unwrap();
    let mut session = QuizSession::new(fixed_now());
    session.add_answer(QuizAnswer::from_submission(&question, 1).unwrap());
    session.add_answer(QuizAnswer::from_submission(&question, 0).unwrap());

    let record = gateway.save_session(&session).await.unwrap();
    assert_eq!(record.domain(DomainTag::Proceso), DomainStats::new(2, 1));

    let saved = backend.saved.lock().unwrap().clone();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["user_id"], 7);
    assert_eq!(saved[0]["proceso_total"], 2);
    assert_eq!(saved[0]["proceso_correct"], 1);
    assert_eq!(saved[0]["personas_total"], 0);
    assert_eq!(saved[0]["end_time"], "2023-11-14T22:13:20Z");
}

#[tokio::test]
async fn history_skips_malformed_records() {
    let (url, _backend) = spawn_backend().await;
    let gateway = gateway(&url);
    let user = gateway.login("pm@example.com", "secret").await.unwrap();

    let history = gateway.fetch_history(user.id).await;
    let ids: Vec<Option<i64>> = history.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![Some(1), Some(4)]);
    assert_eq!(history[0].domain(DomainTag::Personas), DomainStats::new(3, 2));
    assert_eq!(history[1].domain(DomainTag::Personas), DomainStats::default());
    assert_eq!(history[1].domain(DomainTag::Entorno), DomainStats::new(2, 1));
}

#[tokio::test]
async fn unreachable_backend_yields_typed_failures() {
    let gateway = gateway("http://127.0.0.1:9/api");
    assert!(gateway.login("pm@example.com", "secret").await.is_err());
    assert!(gateway.fetch_history(UserId::new(7)).await.is_empty());
}

#[tokio::test]
async fn chat_sends_history_and_parameters() {
    let (url, backend) = spawn_backend().await;
    let gateway = gateway(&url);
    gateway.login("pm@example.com", "secret").await.unwrap();

    let request = ChatRequest {
        message: "What is a charter?".into(),
        message_history: vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
        max_tokens: 4096,
        temperature: 0.7,
    };
    let reply = gateway.chat(&request).await.unwrap();
    assert_eq!(reply, "You asked: What is a charter?");

    let sent = backend.chats.lock().unwrap().clone();
    assert_eq!(sent[0]["max_tokens"], 4096);
    assert_eq!(sent[0]["message_history"][1]["role"], "assistant");
}
