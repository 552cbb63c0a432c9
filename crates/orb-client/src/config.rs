//! Client configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::ClientError;

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.withorb.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Paths searched for an `orb.json` secrets file, in order.
const SECRET_PATHS: [&str; 2] = [".secrets/orb.json", "../.secrets/orb.json"];

/// Client options for customization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// API base URL (default: `https://api.withorb.com/v1`).
    pub base_url: String,
    /// Request timeout in seconds (default: 60).
    pub timeout_seconds: u64,
    /// Retries for transient failures (default: 0, no retries).
    pub max_retries: u32,
    /// Run `Validate` on every decoded response (default: false).
    pub response_validation: bool,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: 0,
            response_validation: false,
            user_agent: concat!("orb-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the number of retries for transient failures.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Enable or disable response validation.
    #[must_use]
    pub fn with_response_validation(mut self, enable: bool) -> Self {
        self.response_validation = enable;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Orb secrets file structure.
#[derive(Debug, Deserialize)]
struct OrbSecrets {
    api_key: String,
    #[serde(default)]
    base_url: Option<String>,
}

/// API key and options resolved from the environment.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// API key.
    pub api_key: String,
    /// Client options.
    pub options: ClientOptions,
}

impl EnvConfig {
    /// Load configuration from a secrets file and environment variables.
    ///
    /// The API key and base URL come from the first `.secrets/orb.json`
    /// found, falling back to `ORB_API_KEY` and `ORB_BASE_URL`.
    /// `ORB_TIMEOUT_SECONDS`, `ORB_MAX_RETRIES` and
    /// `ORB_RESPONSE_VALIDATION` are read from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when no API key is found or
    /// when one of the numeric or boolean variables is set but unparsable.
    pub fn from_env() -> Result<Self, ClientError> {
        let (api_key, base_url) = load_orb_secrets(&SECRET_PATHS);
        let api_key = api_key.ok_or_else(|| {
            ClientError::Configuration(
                "no API key: set ORB_API_KEY or provide .secrets/orb.json".to_string(),
            )
        })?;

        let defaults = ClientOptions::default();
        let options = ClientOptions {
            base_url: base_url.unwrap_or(defaults.base_url),
            timeout_seconds: env_parse("ORB_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.timeout_seconds),
            max_retries: env_parse("ORB_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            response_validation: env_parse("ORB_RESPONSE_VALIDATION")?
                .unwrap_or(defaults.response_validation),
            user_agent: defaults.user_agent,
        };

        Ok(Self { api_key, options })
    }
}

fn env_parse<T>(name: &str) -> Result<Option<T>, ClientError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_setting(name, std::env::var(name).ok().as_deref())
}

/// Parse one setting. Unset or blank means "use the default".
fn parse_setting<T>(name: &str, raw: Option<&str>) -> Result<Option<T>, ClientError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            ClientError::Configuration(format!("invalid {name}={value:?}: {e}"))
        }),
    }
}

/// Load the API key and base URL from file or environment.
fn load_orb_secrets(paths: &[&str]) -> (Option<String>, Option<String>) {
    for path in paths {
        if let Ok(secrets) = load_secrets_file::<OrbSecrets>(path) {
            tracing::info!(path = %path, "Loaded Orb secrets from file");
            return (Some(secrets.api_key), secrets.base_url);
        }
    }

    tracing::debug!("Orb secrets file not found, using environment variables");
    (
        std::env::var("ORB_API_KEY").ok(),
        std::env::var("ORB_BASE_URL").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url, "https://api.withorb.com/v1");
        assert_eq!(options.timeout_seconds, 60);
        assert_eq!(options.max_retries, 0);
        assert!(!options.response_validation);
        assert!(options.user_agent.starts_with("orb-client/"));
    }

    #[test]
    fn test_builder_methods() {
        let options = ClientOptions::default()
            .with_base_url("http://localhost:9000")
            .with_timeout_seconds(5)
            .with_max_retries(2)
            .with_response_validation(true);
        assert_eq!(options.base_url, "http://localhost:9000");
        assert_eq!(options.timeout_seconds, 5);
        assert_eq!(options.max_retries, 2);
        assert!(options.response_validation);
    }

    #[test]
    fn test_secrets_file_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orb.json");
        std::fs::write(
            &path,
            r#"{"api_key": "file-key", "base_url": "http://orb.internal/v1"}"#,
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let (api_key, base_url) = load_orb_secrets(&["/nonexistent/orb.json", &path]);
        assert_eq!(api_key.as_deref(), Some("file-key"));
        assert_eq!(base_url.as_deref(), Some("http://orb.internal/v1"));
    }

    #[test]
    fn test_settings_parse_or_fall_back() {
        assert_eq!(parse_setting::<u32>("ORB_MAX_RETRIES", Some(" 3 ")).unwrap(), Some(3));
        assert_eq!(parse_setting::<u32>("ORB_MAX_RETRIES", None).unwrap(), None);
        assert_eq!(parse_setting::<u32>("ORB_MAX_RETRIES", Some("")).unwrap(), None);
        assert_eq!(
            parse_setting::<bool>("ORB_RESPONSE_VALIDATION", Some("true")).unwrap(),
            Some(true)
        );
    }

    #[test]
    fn test_malformed_setting_is_an_error() {
        let err = parse_setting::<u64>("ORB_TIMEOUT_SECONDS", Some("soon")).unwrap_err();
        match err {
            ClientError::Configuration(message) => {
                assert!(message.contains("ORB_TIMEOUT_SECONDS"));
                assert!(message.contains("soon"));
            }
            other => panic!("expected Configuration, got {other:?}"),
        }
        assert!(parse_setting::<bool>("ORB_RESPONSE_VALIDATION", Some("yes")).is_err());
    }

    #[test]
    fn test_malformed_secrets_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orb.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_secrets_file::<OrbSecrets>(&path.to_string_lossy()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
