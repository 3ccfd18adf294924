//! Exchange credentials loaded from the process environment

use std::fmt;
use tracing::{error, info};

use services_common::{ENV_API_KEY, ENV_API_SECRET, ProxyError};

/// API key and signing secret for the exchange account
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load credentials from the environment, reading a `.env` file if present
    ///
    /// # Errors
    /// Returns [`ProxyError::Configuration`] if either variable is missing or empty
    pub fn from_env() -> Result<Self, ProxyError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns [`ProxyError::Configuration`] if either variable is missing or empty
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProxyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        match (read(ENV_API_KEY), read(ENV_API_SECRET)) {
            (Some(api_key), Some(api_secret)) => {
                info!("Loaded exchange API credentials from environment");
                Ok(Self::new(api_key, api_secret))
            }
            (key, secret) => {
                let missing: Vec<&str> = [(ENV_API_KEY, key.is_none()), (ENV_API_SECRET, secret.is_none())]
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then_some(name))
                    .collect();
                error!(missing = ?missing, "API credentials not configured in environment");
                Err(ProxyError::Configuration("API credentials missing.".to_string()))
            }
        }
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let partial = self.api_key.get(..8).map_or_else(|| "partial".to_string(), |p| format!("{p}..."));
        f.debug_struct("Credentials")
            .field("api_key", &partial)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup_from(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_both_variables_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("BINANCE_API_KEY", "abcdefghijkl"),
            ("BINANCE_API_SECRET", "s3cr3t"),
        ]))
        .unwrap();
        assert_eq!(creds.api_key(), "abcdefghijkl");
        assert_eq!(creds.api_secret(), "s3cr3t");
    }

    #[rstest]
    #[case(&[])]
    #[case(&[("BINANCE_API_KEY", "key")])]
    #[case(&[("BINANCE_API_SECRET", "secret")])]
    #[case(&[("BINANCE_API_KEY", "key"), ("BINANCE_API_SECRET", "  ")])]
    fn test_missing_credentials_are_configuration_errors(
        #[case] pairs: &[(&'static str, &'static str)],
    ) {
        let err = Credentials::from_lookup(lookup_from(pairs)).unwrap_err();
        assert!(matches!(err, ProxyError::Configuration(_)));
        assert_eq!(err.to_body().code.to_string(), "CONFIG_ERROR");
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let creds = Credentials::new("abcdefghijkl", "topsecret");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("topsecret"));
        assert!(!rendered.contains("ijkl"));
        assert!(rendered.contains("abcdefgh..."));
    }
}
