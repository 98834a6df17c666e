use std::sync::LazyLock;
use std::time::Duration;

/// Global HTTP client shared by the review API client and the Telegram
/// provider.
///
/// Built lazily on first access. Individual requests override the total
/// timeout with the per-service value from configuration.
///
/// # Features
/// - **Connection pooling**: the poller talks to the same two hosts forever
/// - **Compression**: gzip, deflate, brotli and zstd
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **TLS**: rustls, no OpenSSL dependency
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(user_agent())
        .build()
        .expect("Failed to build HTTP client")
});

fn user_agent() -> String {
    format!("homework-bot/{}", crate::pkg_version())
}
