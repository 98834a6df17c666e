mod common;

use axum::http::StatusCode;
use common::{BOT_TOKEN, CHAT_ID, PRACTICUM_TOKEN, PracticumStub, TelegramStub};
use homework_bot::config::{PracticumConfig, TelegramConfig};
use homework_bot::error::AppError;
use homework_bot::external::{HomeworkStatusProvider, PracticumClient};
use homework_bot::services::notifications::NotificationMessage;
use homework_bot::services::{NotificationProvider, TelegramProvider, check_response};
use serde_json::json;

fn practicum_client(stub: &PracticumStub) -> PracticumClient {
    let config = PracticumConfig {
        endpoint: stub.endpoint(),
        request_timeout: 5,
        ..Default::default()
    };
    PracticumClient::new(&config, PRACTICUM_TOKEN)
}

fn telegram_provider(stub: &TelegramStub, token: &str) -> TelegramProvider {
    let config = TelegramConfig {
        api_url: stub.base_url.clone(),
        request_timeout: 5,
        ..Default::default()
    };
    TelegramProvider::new(&config, token, CHAT_ID)
}

#[tokio::test]
async fn practicum_request_carries_cursor_and_oauth_header() {
    let stub = PracticumStub::start().await;
    stub.reply_json(json!({
        "homeworks": [{"homework_name": "hw1", "status": "approved"}],
        "current_date": 1700000600
    }));

    let body = practicum_client(&stub).fetch_statuses(1_700_000_000).await.unwrap();
    let records = check_response(&body).unwrap();
    assert_eq!(records[0]["homework_name"], json!("hw1"));

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].from_date.as_deref(), Some("1700000000"));
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some(format!("OAuth {PRACTICUM_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn practicum_non_success_status_is_upstream_error() {
    let stub = PracticumStub::start().await;
    stub.reply_raw(StatusCode::SERVICE_UNAVAILABLE, "{}");

    let err = practicum_client(&stub).fetch_statuses(0).await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamStatus { status: 503 }), "got {err:?}");
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn practicum_undecodable_body_is_transport_error() {
    let stub = PracticumStub::start().await;
    stub.reply_raw(StatusCode::OK, "<html>maintenance</html>");

    let err = practicum_client(&stub).fetch_statuses(0).await.unwrap_err();
    assert!(matches!(err, AppError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn telegram_send_delivers_to_configured_chat() {
    let stub = TelegramStub::start().await;
    let provider = telegram_provider(&stub, BOT_TOKEN);

    let result = provider.send(&NotificationMessage::new("hello")).await.unwrap();
    assert_eq!(result.status_code, 200);
    assert_eq!(result.message_id, Some(1));

    let sent = stub.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, json!(CHAT_ID));
    assert_eq!(sent[0].text, "hello");
}

#[tokio::test]
async fn telegram_rejected_token_is_unauthorized() {
    let stub = TelegramStub::start().await;
    let provider = telegram_provider(&stub, "999:wrong");

    let err = provider.send(&NotificationMessage::new("hello")).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { .. }), "got {err:?}");

    let err = provider.validate_config().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { .. }), "got {err:?}");
    assert!(stub.sent().is_empty());
}

#[tokio::test]
async fn telegram_api_refusal_is_notification_error() {
    let stub = TelegramStub::start().await;
    stub.fail_next(StatusCode::BAD_REQUEST, "Bad Request: chat not found");
    let provider = telegram_provider(&stub, BOT_TOKEN);

    let err = provider.send(&NotificationMessage::new("hello")).await.unwrap_err();
    match err {
        AppError::Notification {
            message,
            status_code,
            ..
        } => {
            assert!(message.contains("chat not found"));
            assert_eq!(status_code, Some(400));
        }
        other => panic!("Expected Notification, got {other:?}"),
    }
}

#[tokio::test]
async fn telegram_get_me_reports_identity() {
    let stub = TelegramStub::start().await;
    let provider = telegram_provider(&stub, BOT_TOKEN);

    let identity = provider.get_me().await.unwrap();
    assert_eq!(identity.username.as_deref(), Some("homework_test_bot"));
    assert!(provider.validate_config().await.is_ok());
}
