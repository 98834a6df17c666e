#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use homework_bot::config::Settings;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PRACTICUM_TOKEN: &str = "y0_test_practicum";
pub const BOT_TOKEN: &str = "123456:test-bot";
pub const CHAT_ID: &str = "4242";

async fn serve(router: Router) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    (format!("http://{addr}"), handle)
}

// ---------------------------------------------------------------------------
// Review API stub
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatusRequest {
    pub from_date: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct PracticumState {
    replies: Mutex<VecDeque<(StatusCode, String)>>,
    requests: Mutex<Vec<StatusRequest>>,
}

pub struct PracticumStub {
    pub base_url: String,
    state: Arc<PracticumState>,
    _handle: JoinHandle<()>,
}

impl PracticumStub {
    pub async fn start() -> Self {
        let state = Arc::new(PracticumState::default());
        let router = Router::new()
            .route("/api/user_api/homework_statuses/", get(homework_statuses))
            .with_state(state.clone());
        let (base_url, handle) = serve(router).await;
        Self {
            base_url,
            state,
            _handle: handle,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/user_api/homework_statuses/", self.base_url)
    }

    /// Queue a JSON reply; once the queue is empty the stub answers
    /// `{"homeworks": []}`.
    pub fn reply_json(&self, body: Value) {
        self.reply_raw(StatusCode::OK, body.to_string());
    }

    pub fn reply_raw(&self, status: StatusCode, body: impl Into<String>) {
        self.state
            .replies
            .lock()
            .unwrap()
            .push_back((status, body.into()));
    }

    pub fn requests(&self) -> Vec<StatusRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn homework_statuses(
    State(state): State<Arc<PracticumState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, [(&'static str, &'static str); 1], String) {
    state.requests.lock().unwrap().push(StatusRequest {
        from_date: query.get("from_date").cloned(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let (status, body) = state
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| (StatusCode::OK, json!({"homeworks": []}).to_string()));
    (status, [("content-type", "application/json")], body)
}

// ---------------------------------------------------------------------------
// Telegram Bot API stub
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: Value,
    pub text: String,
}

#[derive(Default)]
struct TelegramState {
    sent: Mutex<Vec<SentMessage>>,
    /// Replies used instead of a successful delivery, consumed in order
    failures: Mutex<VecDeque<(StatusCode, Value)>>,
}

pub struct TelegramStub {
    pub base_url: String,
    state: Arc<TelegramState>,
    _handle: JoinHandle<()>,
}

impl TelegramStub {
    pub async fn start() -> Self {
        let state = Arc::new(TelegramState::default());
        let router = Router::new()
            .route("/{bot}/getMe", get(get_me))
            .route("/{bot}/sendMessage", post(send_message))
            .with_state(state.clone());
        let (base_url, handle) = serve(router).await;
        Self {
            base_url,
            state,
            _handle: handle,
        }
    }

    pub fn fail_next(&self, status: StatusCode, description: &str) {
        self.state.failures.lock().unwrap().push_back((
            status,
            json!({"ok": false, "error_code": status.as_u16(), "description": description}),
        ));
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
    )
}

async fn get_me(Path(bot): Path<String>) -> (StatusCode, Json<Value>) {
    if bot != format!("bot{BOT_TOKEN}") {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "result": {"id": 123456, "is_bot": true, "first_name": "Homework", "username": "homework_test_bot"}
        })),
    )
}

async fn send_message(
    State(state): State<Arc<TelegramState>>,
    Path(bot): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if bot != format!("bot{BOT_TOKEN}") {
        return unauthorized();
    }
    if let Some((status, reply)) = state.failures.lock().unwrap().pop_front() {
        return (status, Json(reply));
    }

    let mut sent = state.sent.lock().unwrap();
    sent.push(SentMessage {
        chat_id: body["chat_id"].clone(),
        text: body["text"].as_str().unwrap_or_default().to_string(),
    });
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "result": {"message_id": sent.len(), "chat": {"id": 4242}, "text": body["text"]}
        })),
    )
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub fn settings_for(practicum: &PracticumStub, telegram: &TelegramStub) -> Settings {
    let mut settings = Settings::default();
    settings.practicum.endpoint = practicum.endpoint();
    settings.practicum.token = PRACTICUM_TOKEN.to_string();
    settings.practicum.request_timeout = 5;
    settings.telegram.api_url = telegram.base_url.clone();
    settings.telegram.token = BOT_TOKEN.to_string();
    settings.telegram.chat_id = CHAT_ID.to_string();
    settings.telegram.request_timeout = 5;
    settings.poller.retry_interval = 600;
    settings
}
