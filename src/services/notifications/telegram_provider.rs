//! Telegram Bot API notification provider.
//!
//! Uses the global `HTTP_CLIENT`. The bot token is part of every request
//! path, so transport errors are stripped of their URL before they can reach
//! a log line or the chat.

use super::provider::{NotificationMessage, NotificationProvider, NotificationResult};
use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::{Duration, Instant};

const PROVIDER_NAME: &str = "telegram";

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Bot account behind the configured token, as reported by `getMe`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub first_name: String,
}

pub struct TelegramProvider {
    api_url: String,
    token: String,
    chat_id: String,
    timeout: Duration,
}

impl TelegramProvider {
    pub fn new(config: &TelegramConfig, token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            timeout: Duration::from_secs(config.request_timeout),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    /// Call a Bot API method and unwrap its `result`.
    ///
    /// Returns the HTTP status alongside the result for delivery reporting.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: Option<serde_json::Value>,
    ) -> AppResult<(u16, T)> {
        let request = match payload {
            Some(body) => HTTP_CLIENT.post(self.method_url(method)).json(&body),
            None => HTTP_CLIENT.get(self.method_url(method)),
        };

        let resp = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::transport(format!("calling Telegram {method}"), e.without_url()))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            AppError::transport(format!("reading Telegram {method} response"), e.without_url())
        })?;
        let envelope = serde_json::from_str::<ApiEnvelope<T>>(&body).ok();

        let (ok, description) = match &envelope {
            Some(env) => (env.ok, env.description.clone()),
            None => (false, None),
        };

        if !(200..300).contains(&status) || !ok {
            return Err(classify_failure(method, status, description));
        }

        envelope
            .and_then(|env| env.result)
            .map(|result| (status, result))
            .ok_or_else(|| AppError::Notification {
                provider: PROVIDER_NAME.to_string(),
                message: format!("{method} returned no result"),
                status_code: Some(status),
            })
    }

    /// Look up the bot account; fails with `Unauthorized` for a rejected token.
    pub async fn get_me(&self) -> AppResult<BotIdentity> {
        let (_, identity) = self.call::<BotIdentity>("getMe", None).await?;
        Ok(identity)
    }
}

/// Map a failed Bot API call to an error.
///
/// 401 and 404 are what the API answers for an invalid token, 403 for a
/// bot that may not write to the chat.
fn classify_failure(method: &str, status: u16, description: Option<String>) -> AppError {
    let detail = description.unwrap_or_else(|| format!("HTTP {status}"));
    match status {
        401 | 403 | 404 => AppError::Unauthorized {
            message: format!("Telegram rejected the bot: {detail}"),
        },
        _ => AppError::Notification {
            provider: PROVIDER_NAME.to_string(),
            message: format!("{method}: {detail}"),
            status_code: Some(status),
        },
    }
}

#[async_trait]
impl NotificationProvider for TelegramProvider {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        let start = Instant::now();

        let (status_code, sent) = self
            .call::<SentMessage>(
                "sendMessage",
                Some(json!({
                    "chat_id": self.chat_id,
                    "text": message.text,
                })),
            )
            .await?;

        Ok(NotificationResult {
            status_code,
            message_id: Some(sent.message_id),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn validate_config(&self) -> AppResult<()> {
        let identity = self.get_me().await?;
        tracing::debug!(
            bot_id = identity.id,
            username = identity.username.as_deref().unwrap_or(&identity.first_name),
            "Telegram bot token accepted"
        );
        Ok(())
    }
}
