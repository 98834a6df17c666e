use super::provider::HomeworkStatusProvider;
use crate::config::PracticumConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

/// Client for the homework review-status endpoint
pub struct PracticumClient {
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, token: impl Into<String>) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            token: token.into(),
            timeout: Duration::from_secs(config.request_timeout),
        }
    }

    fn authorization(&self) -> String {
        format!("OAuth {}", self.token)
    }

    /// `{endpoint}?from_date=<ts>`, keeping any query the endpoint already has
    fn request_url(&self, from_date: i64) -> AppResult<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| AppError::Configuration {
            key: "practicum.endpoint".to_string(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("from_date", &from_date.to_string());
        Ok(url)
    }
}

#[async_trait]
impl HomeworkStatusProvider for PracticumClient {
    fn name(&self) -> &'static str {
        "practicum"
    }

    async fn fetch_statuses(&self, from_date: i64) -> AppResult<serde_json::Value> {
        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let resp = HTTP_CLIENT
            .get(self.request_url(from_date)?)
            .header(AUTHORIZATION, self.authorization())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::transport("requesting homework statuses", e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Review API returned an error status");
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::transport("decoding homework statuses", e))
    }
}
