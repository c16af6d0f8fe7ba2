//! Microsoft Graph client configuration.

use std::time::Duration;

/// Default Graph API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`GraphClient`](super::GraphClient).
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Base endpoint, including the API version segment.
    pub endpoint: String,

    /// Bound applied to every request, so that one unresponsive calendar
    /// cannot stall a resolution.
    pub timeout: Duration,

    /// User agent sent with each request.
    pub user_agent: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("roomfinder/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GraphConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Builder: set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint without surrounding whitespace or trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }

    /// Checks that the endpoint is an absolute http(s) URL and the timeout
    /// is non-zero.
    pub fn validate(&self) -> Result<(), String> {
        let base = self.base_url();
        if base.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        let url = url::Url::parse(base).map_err(|e| format!("invalid endpoint '{}': {}", base, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "endpoint must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if url.cannot_be_a_base() {
            return Err(format!("endpoint '{}' cannot be used as a base URL", base));
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.base_url(), DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("roomfinder/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn base_url_strips_trailing_slashes() {
        let config = GraphConfig::new(" http://127.0.0.1:8080/v1.0// ");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/v1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(GraphConfig::new("").validate().is_err());
        assert!(GraphConfig::new("graph.microsoft.com").validate().is_err());
        assert!(GraphConfig::new("ftp://example.com").validate().is_err());
        assert!(GraphConfig::new("mailto:rooms@example.com").validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = GraphConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().unwrap_err().contains("timeout"));
    }
}
