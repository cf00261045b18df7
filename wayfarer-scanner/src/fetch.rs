use crate::error::{Result, ScanError};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Something that can fetch a page body over HTTP.
pub trait Fetcher {
    /// Returns the body of a successful response. Transport errors and
    /// non-success statuses are both errors.
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Blocking [`Fetcher`] backed by reqwest.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Wayfarer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(connect_timeout(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

/// Half the request timeout, never below one second.
fn connect_timeout(timeout_secs: u64) -> Duration {
    Duration::from_secs((timeout_secs / 2).max(1))
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Other(format!("{} returned {}", url, status)));
        }
        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_timeout_is_half() {
        assert_eq!(connect_timeout(30), Duration::from_secs(15));
    }

    #[test]
    fn test_connect_timeout_never_zero() {
        assert_eq!(connect_timeout(1), Duration::from_secs(1));
        assert_eq!(connect_timeout(0), Duration::from_secs(1));
        assert!(HttpFetcher::with_timeout(1).is_ok());
    }
}
