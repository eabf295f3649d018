// HTTP client utilities
use reqwest::Client;
use std::time::Duration;

/// Create the HTTP client used for provider calls
///
/// `timeout` bounds each whole request; hanging calls fail with a reqwest
/// timeout error rather than a local deadline.
pub fn create_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!("aitranslator/", env!("CARGO_PKG_VERSION")))
        .build()
}
