//! Client configuration.
//!
//! Built once and never mutated. `DnsimpleClient` reads it to build every
//! request; `UreqTransport` reads the timeout.

use std::time::Duration;

use crate::error::ApiError;

pub const PRODUCTION_BASE_URL: &str = "https://api.dnsimple.com";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.dnsimple.com";

/// Identifier sent in `User-Agent`, after any caller-supplied prefix.
pub const DEFAULT_USER_AGENT: &str = concat!("dnsimple-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub user_agent: Option<String>,
    pub default_headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
            user_agent: None,
            default_headers: Vec::new(),
            timeout: None,
        }
    }

    pub fn sandbox() -> Self {
        Self::new(SANDBOX_BASE_URL)
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Add a header sent with every request. A name matching a built-in
    /// header such as `Accept` or `Authorization` replaces it.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read configuration from `DNSIMPLE_BASE_URL`, `DNSIMPLE_ACCESS_TOKEN`,
    /// `DNSIMPLE_USER_AGENT` and `DNSIMPLE_TIMEOUT_SECS`. All are optional.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup("DNSIMPLE_BASE_URL").unwrap_or_else(|| PRODUCTION_BASE_URL.to_string());
        let mut config = Self::new(&base_url);
        config.access_token = lookup("DNSIMPLE_ACCESS_TOKEN").filter(|t| !t.is_empty());
        config.user_agent = lookup("DNSIMPLE_USER_AGENT").filter(|u| !u.is_empty());
        if let Some(secs) = lookup("DNSIMPLE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::InvalidInput(format!("DNSIMPLE_TIMEOUT_SECS is not a number of seconds: {secs:?}"))
            })?;
            if secs == 0 {
                return Err(ApiError::InvalidInput(
                    "DNSIMPLE_TIMEOUT_SECS must be at least 1 second".to_string(),
                ));
            }
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Full `User-Agent` header value.
    pub fn user_agent_header(&self) -> String {
        match &self.user_agent {
            Some(prefix) => format!("{prefix} {DEFAULT_USER_AGENT}"),
            None => DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(PRODUCTION_BASE_URL)
    }
}

// Hand-written so the token never ends up in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(ClientConfig::new("https://api.dnsimple.test/").base_url, "https://api.dnsimple.test");
    }

    #[test]
    fn env_defaults_to_production() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, PRODUCTION_BASE_URL);
        assert_eq!(config.access_token, None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DNSIMPLE_BASE_URL", "https://api.sandbox.dnsimple.com/"),
            ("DNSIMPLE_ACCESS_TOKEN", "a1b2c3"),
            ("DNSIMPLE_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, SANDBOX_BASE_URL);
        assert_eq!(config.access_token.as_deref(), Some("a1b2c3"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_timeout_is_invalid_input() {
        let err = ClientConfig::from_lookup(lookup(&[("DNSIMPLE_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn zero_timeout_is_invalid_input() {
        let err = ClientConfig::from_lookup(lookup(&[("DNSIMPLE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn user_agent_prefix() {
        let config = ClientConfig::default().with_user_agent("my-app/1.0");
        assert_eq!(config.user_agent_header(), format!("my-app/1.0 {DEFAULT_USER_AGENT}"));
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::default().with_access_token("secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
