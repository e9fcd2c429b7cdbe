//! Configuration management for the Zoho client.
//!
//! Supports configuration via:
//! - Explicit values
//! - Environment variables
//! - Builder pattern
//!
//! Credentials are not part of the configuration; the host supplies a
//! [`CredentialBundle`](crate::token::CredentialBundle) per connection.

use crate::core::DEFAULT_MAX_RESPONSE_SIZE;
use crate::error::{ConfigurationError, ZohoResult};
use std::time::Duration;

/// Largest page size Zoho list endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Configuration for the Zoho client
#[derive(Debug, Clone)]
pub struct ZohoConfig {
    /// Request timeout, applied to API calls and token refreshes
    pub timeout: Duration,
    /// Maximum accepted response body size in bytes
    pub max_response_size: usize,
    /// Page size used when a list query does not set `per_page`
    pub default_page_size: u32,
    /// Optional cap on pages fetched in one pagination run
    pub max_pages: Option<u32>,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ZohoConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            default_page_size: crate::DEFAULT_PAGE_SIZE,
            max_pages: None,
            user_agent: format!("integrations-zoho/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ZohoConfig {
    /// Create a new configuration builder
    pub fn builder() -> ZohoConfigBuilder {
        ZohoConfigBuilder::new()
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `ZOHO_TIMEOUT` - request timeout in seconds
    /// - `ZOHO_PAGE_SIZE` - default page size for list endpoints
    /// - `ZOHO_MAX_PAGES` - cap on pages per pagination run
    /// - `ZOHO_USER_AGENT` - User-Agent header value
    pub fn from_env() -> ZohoResult<Self> {
        let mut builder = ZohoConfigBuilder::new();

        if let Some(secs) = env_number::<u64>("ZOHO_TIMEOUT")? {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(size) = env_number::<u32>("ZOHO_PAGE_SIZE")? {
            builder = builder.default_page_size(size);
        }

        if let Some(pages) = env_number::<u32>("ZOHO_MAX_PAGES")? {
            builder = builder.max_pages(pages);
        }

        if let Ok(agent) = std::env::var("ZOHO_USER_AGENT") {
            builder = builder.user_agent(agent);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "Timeout must be greater than zero".to_string(),
            });
        }

        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            return Err(ConfigurationError::InvalidConfiguration {
                message: format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        if self.max_pages == Some(0) {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "max_pages must be greater than zero when set".to_string(),
            });
        }

        if self.max_response_size == 0 {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "max_response_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn env_number<N: std::str::FromStr>(name: &str) -> Result<Option<N>, ConfigurationError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<N>()
            .map(Some)
            .map_err(|_| ConfigurationError::EnvVar(format!("{} must be a number, got '{}'", name, raw))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigurationError::EnvVar(format!("{}: {}", name, e))),
    }
}

/// Builder for Zoho configuration
#[derive(Debug, Default)]
pub struct ZohoConfigBuilder {
    config: ZohoConfig,
}

impl ZohoConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum accepted response size
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.config.max_response_size = bytes;
        self
    }

    /// Set the default page size
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.config.default_page_size = size;
        self
    }

    /// Cap the number of pages fetched per pagination run
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.config.max_pages = Some(pages);
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ZohoResult<ZohoConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
