use crate::error::AppResult;
use async_trait::async_trait;

/// Source of homework review statuses.
///
/// `from_date` is a unix timestamp lower bound; the raw JSON body is
/// returned so that shape checks happen in one place
/// ([`crate::services::check_response`]).
#[async_trait]
pub trait HomeworkStatusProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_statuses(&self, from_date: i64) -> AppResult<serde_json::Value>;
}
