use crate::config::FetchConfig;
use crate::error::ImportError;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

/// Fetches recipe pages over HTTP with a bounded timeout and retries on
/// transient failures.
#[derive(Debug, Clone)]
pub struct RequestFetcher {
    client: Client,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Fetch the body of `url` as text.
    ///
    /// Timeouts, connection errors and 5xx statuses are retried up to
    /// `retry_attempts` more times; any other failure is returned at once.
    pub async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        let max_attempts = self.retry_attempts + 1;
        let mut attempt = 1;

        loop {
            debug!("Fetching {} (attempt {}/{})", url, attempt, max_attempts);

            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    warn!(
                        "Fetching {} failed (attempt {}/{}): {}",
                        url, attempt, max_attempts, e
                    );
                    let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
                    debug!("Waiting {:?} before retry", delay);
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ImportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
