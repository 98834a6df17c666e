//! The polling loop: fetch, validate, translate, notify, advance.

use super::notifications::{NotificationService, TelegramProvider};
use super::status::{PollState, check_response, parse_status};
use crate::config::{Credentials, Settings};
use crate::error::{AppError, AppResult};
use crate::external::{HomeworkStatusProvider, PracticumClient};
use crate::models::HomeworkRecord;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What a single successful cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response listed no homework
    NoUpdates,
    /// The newest verdict matches the one already announced
    Unchanged,
    /// A status-change message was delivered
    Notified(String),
    /// The message equals the last delivered one and was not resent
    Suppressed(String),
}

/// How `StatusPoller::run` ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Interrupted,
}

pub struct StatusPoller {
    source: Arc<dyn HomeworkStatusProvider>,
    notifier: NotificationService,
    credentials: Credentials,
    interval: Duration,
    state: PollState,
}

impl StatusPoller {
    pub fn new(
        source: Arc<dyn HomeworkStatusProvider>,
        notifier: NotificationService,
        credentials: Credentials,
        interval: Duration,
        cursor: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            credentials,
            interval,
            state: PollState::starting_at(cursor),
        }
    }

    /// Wire the Practicum client and Telegram provider from settings.
    ///
    /// Fails with a fatal configuration error when a secret is missing.
    pub fn from_settings(settings: &Settings, cursor: i64) -> AppResult<Self> {
        let credentials = settings.check_tokens()?;
        let source = PracticumClient::new(&settings.practicum, credentials.practicum_token.clone());
        let provider = TelegramProvider::new(
            &settings.telegram,
            credentials.telegram_token.clone(),
            credentials.chat_id.clone(),
        );

        Ok(Self::new(
            Arc::new(source),
            NotificationService::new(Arc::new(provider)),
            credentials,
            settings.poller.interval(),
            cursor,
        ))
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn notifier(&self) -> &NotificationService {
        &self.notifier
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one poll: fetch from the cursor, announce a changed verdict of
    /// the newest homework, then move the cursor one interval forward.
    ///
    /// The cursor stays put when any step fails.
    pub async fn run_cycle(&mut self) -> AppResult<CycleOutcome> {
        self.credentials.ensure_present()?;

        tracing::debug!(
            source = self.source.name(),
            cursor = self.state.cursor,
            "Polling for homework updates"
        );
        let response = self.source.fetch_statuses(self.state.cursor).await?;
        let records = check_response(&response)?;

        let outcome = match records.first() {
            None => CycleOutcome::NoUpdates,
            Some(latest) => {
                let previous = self.state.last_verdict;
                match parse_status(&mut self.state, &HomeworkRecord::from(latest))? {
                    None => CycleOutcome::Unchanged,
                    Some(message) => match self.notifier.send_message(&message).await {
                        Ok(true) => CycleOutcome::Notified(message),
                        Ok(false) => CycleOutcome::Suppressed(message),
                        Err(e) => {
                            // announce again on the next cycle
                            self.state.last_verdict = previous;
                            return Err(e);
                        }
                    },
                }
            }
        };

        self.state.advance(self.interval.as_secs());
        Ok(outcome)
    }

    /// Log a failed cycle and try to tell the chat about it.
    ///
    /// A delivery failure here is only logged.
    pub async fn report_failure(&mut self, error: &AppError) {
        tracing::error!(error = %error, "Polling cycle failed");

        let message = format!("Program failure: {error}");
        if let Err(send_error) = self.notifier.send_message(&message).await {
            tracing::warn!(error = %send_error, "Could not report the failure to the chat");
        }
    }

    /// Poll until `shutdown` is cancelled or a fatal error occurs.
    ///
    /// Non-fatal failures are reported and the loop carries on after the
    /// usual pause.
    pub async fn run(&mut self, shutdown: CancellationToken) -> AppResult<PollOutcome> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            cursor = self.state.cursor,
            "Status poller started"
        );

        loop {
            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = self.run_cycle() => result,
            };

            match result {
                Ok(outcome) => {
                    tracing::debug!(?outcome, next_cursor = self.state.cursor, "Cycle completed");
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(error = %e, "Stopping poller on fatal error");
                    return Err(e);
                }
                Err(e) => {
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = self.report_failure(&e) => {}
                    }
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Status poller interrupted");
        Ok(PollOutcome::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use crate::services::notifications::notification_service::tests::RecordingProvider;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Source that replays canned responses and records requested cursors.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<AppResult<Value>>>,
        cursors: Mutex<Vec<i64>>,
    }

    impl ScriptedSource {
        fn with(responses: Vec<AppResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                cursors: Mutex::default(),
            })
        }

        fn cursors(&self) -> Vec<i64> {
            self.cursors.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HomeworkStatusProvider for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn fetch_statuses(&self, from_date: i64) -> AppResult<Value> {
            self.cursors.lock().unwrap().push(from_date);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": []})))
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            practicum_token: "p".to_string(),
            telegram_token: "t".to_string(),
            chat_id: "42".to_string(),
        }
    }

    fn poller(source: Arc<ScriptedSource>, provider: Arc<RecordingProvider>) -> StatusPoller {
        StatusPoller::new(
            source,
            NotificationService::new(provider),
            credentials(),
            Duration::from_secs(600),
            1_000,
        )
    }

    fn approved() -> AppResult<Value> {
        Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]}))
    }

    #[tokio::test]
    async fn test_cycle_notifies_and_advances() {
        let source = ScriptedSource::with(vec![approved()]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(source.clone(), provider.clone());

        let outcome = poller.run_cycle().await.unwrap();
        assert!(matches!(outcome, CycleOutcome::Notified(ref m) if m.contains("hw1")));
        assert_eq!(provider.sent().len(), 1);
        assert!(provider.sent()[0].ends_with(Verdict::Approved.text()));
        assert_eq!(poller.state().cursor, 1_600);
        assert_eq!(source.cursors(), vec![1_000]);
    }

    #[tokio::test]
    async fn test_same_verdict_is_announced_once() {
        let source = ScriptedSource::with(vec![approved(), approved()]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(source.clone(), provider.clone());

        poller.run_cycle().await.unwrap();
        assert_eq!(poller.run_cycle().await.unwrap(), CycleOutcome::Unchanged);
        assert_eq!(provider.sent().len(), 1);
        assert_eq!(source.cursors(), vec![1_000, 1_600]);
    }

    #[tokio::test]
    async fn test_empty_list_sends_nothing() {
        let source = ScriptedSource::with(vec![Ok(json!({"homeworks": []}))]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(source, provider.clone());

        assert_eq!(poller.run_cycle().await.unwrap(), CycleOutcome::NoUpdates);
        assert!(provider.sent().is_empty());
        assert_eq!(poller.state().cursor, 1_600);
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_cursor() {
        let source = ScriptedSource::with(vec![
            Err(AppError::UpstreamStatus { status: 503 }),
            Ok(json!({})),
        ]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(source.clone(), provider);

        let err = poller.run_cycle().await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamStatus { status: 503 }));
        let err = poller.run_cycle().await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert_eq!(poller.state().cursor, 1_000);
        assert_eq!(source.cursors(), vec![1_000, 1_000]);
    }

    #[tokio::test]
    async fn test_undelivered_status_is_retried() {
        let source = ScriptedSource::with(vec![approved(), approved()]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(source, provider.clone());

        provider.set_failing(true);
        assert!(poller.run_cycle().await.is_err());
        assert_eq!(poller.state().last_verdict, None);
        assert_eq!(poller.state().cursor, 1_000);

        provider.set_failing(false);
        assert!(matches!(poller.run_cycle().await.unwrap(), CycleOutcome::Notified(_)));
        assert_eq!(provider.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials_are_fatal() {
        let source = ScriptedSource::with(vec![approved()]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = StatusPoller::new(
            source.clone(),
            NotificationService::new(provider),
            Credentials {
                chat_id: String::new(),
                ..credentials()
            },
            Duration::from_secs(600),
            0,
        );

        let err = poller.run_cycle().await.unwrap_err();
        assert!(err.is_fatal());
        assert!(source.cursors().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_failure_is_reported_once() {
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(ScriptedSource::with(vec![]), provider.clone());

        let err = AppError::malformed("API response does not contain the 'homeworks' key");
        poller.report_failure(&err).await;
        poller.report_failure(&err).await;

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Program failure: "));
        assert!(sent[0].contains("homeworks"));
    }

    #[tokio::test]
    async fn test_report_failure_swallows_delivery_error() {
        let provider = Arc::new(RecordingProvider::default());
        provider.set_failing(true);
        let mut poller = poller(ScriptedSource::with(vec![]), provider.clone());

        poller.report_failure(&AppError::MissingName).await;
        assert!(provider.sent().is_empty());
        assert_eq!(poller.notifier().last_sent(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_and_continues_until_cancelled() {
        let source = ScriptedSource::with(vec![
            Ok(json!({"homeworks": "nope"})),
            approved(),
        ]);
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = poller(source.clone(), provider.clone());
        let shutdown = CancellationToken::new();

        let stopper = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(900)).await;
            stopper.cancel();
        });

        let outcome = poller.run(shutdown).await.unwrap();
        assert_eq!(outcome, PollOutcome::Interrupted);

        let sent = provider.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("Program failure: "));
        assert!(sent[1].contains("hw1"));
        assert_eq!(source.cursors(), vec![1_000, 1_000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_fatal_error() {
        let provider = Arc::new(RecordingProvider::default());
        let mut poller = StatusPoller::new(
            ScriptedSource::with(vec![]),
            NotificationService::new(provider.clone()),
            Credentials {
                practicum_token: String::new(),
                ..credentials()
            },
            Duration::from_secs(600),
            0,
        );

        let err = poller.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(provider.sent().is_empty());
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_already_cancelled() {
        let provider = Arc::new(RecordingProvider::default());
        let source = ScriptedSource::with(vec![]);
        let mut poller = poller(source.clone(), provider);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        assert_eq!(poller.run(shutdown).await.unwrap(), PollOutcome::Interrupted);
    }
}
