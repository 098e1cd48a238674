//! Relay configuration.
//!
//! Secrets come from the environment (optionally seeded from a `.env` file by
//! the binary). Tunables have defaults and builder-style overrides.
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: OAuth token for the homework status API
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat id (or `@channel`) that receives notifications
//!
//! Optional:
//! - `HOMEWORK_BOT_DIR`: Override the config directory (default `~/.homework-bot`)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the status API token.
pub const PRACTICUM_TOKEN_ENV: &str = "PRACTICUM_TOKEN";

/// Environment variable holding the bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the destination chat.
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Environment variable for a custom config directory.
pub const CONFIG_DIR_ENV: &str = "HOMEWORK_BOT_DIR";

/// Default status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default pause between cycles.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(600);

/// Default per-request timeout for outbound HTTP calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of connection attempts per fetch.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

const DEFAULT_CONFIG_DIR: &str = ".homework-bot";

/// Get the config directory.
///
/// `HOMEWORK_BOT_DIR` if set, else `~/.homework-bot`, else `.homework-bot`
/// in the current directory.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_CONFIG_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
        })
}

/// Get the `.env` file inside the config directory.
pub fn env_file() -> PathBuf {
    config_dir().join(".env")
}

/// Secrets as read from the environment, possibly incomplete.
#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub chat_id: Option<String>,
}

impl Credentials {
    /// Read all three secrets from the process environment.
    ///
    /// Empty values are treated as absent.
    pub fn from_env() -> Self {
        Self {
            practicum_token: non_empty_var(PRACTICUM_TOKEN_ENV),
            telegram_token: non_empty_var(TELEGRAM_TOKEN_ENV),
            chat_id: non_empty_var(TELEGRAM_CHAT_ID_ENV),
        }
    }

    /// True when every required secret is present.
    pub fn has_all(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of the environment variables that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_ENV, &self.practicum_token),
            (TELEGRAM_TOKEN_ENV, &self.telegram_token),
            (TELEGRAM_CHAT_ID_ENV, &self.chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }

    /// Turn into a complete set of secrets, or report what is missing.
    pub fn require(self) -> Result<Secrets, ConfigError> {
        let missing = self.missing();
        match (self.practicum_token, self.telegram_token, self.chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(chat_id)) if missing.is_empty() => {
                Ok(Secrets {
                    practicum_token,
                    telegram_token,
                    chat_id,
                })
            }
            _ => Err(ConfigError::MissingCredentials(missing)),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &self.practicum_token.as_ref().map(|_| "***"))
            .field("telegram_token", &self.telegram_token.as_ref().map(|_| "***"))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// A complete set of secrets. Constructed once at startup.
#[derive(Clone)]
pub struct Secrets {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Tunables for the poll loop and the status client.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Status endpoint URL.
    pub endpoint: String,
    /// Pause between cycles, regardless of outcome.
    pub retry_interval: Duration,
    /// Timeout applied to every outbound HTTP request.
    pub request_timeout: Duration,
    /// Connection attempts per fetch before giving up.
    pub max_attempts: u32,
    /// First backoff delay between connection attempts.
    pub backoff_base: Duration,
    /// Upper bound for the backoff delay.
    pub backoff_max: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(30),
        }
    }
}

impl PollerConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the pause between cycles.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the number of connection attempts. Zero is clamped to one.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the backoff bounds between connection attempts.
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max.max(base);
        self
    }

    /// Delay before the given retry (1-based), doubling and capped.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Credentials {
        Credentials {
            practicum_token: Some("p".into()),
            telegram_token: Some("t".into()),
            chat_id: Some("42".into()),
        }
    }

    #[test]
    fn test_has_all_with_every_secret() {
        assert!(full().has_all());
        assert!(full().require().is_ok());
    }

    #[test]
    fn test_missing_and_empty_secrets() {
        let creds = Credentials {
            telegram_token: Some(String::new()),
            ..full()
        };
        assert!(!creds.has_all());
        assert_eq!(creds.missing(), vec![TELEGRAM_TOKEN_ENV]);

        let err = Credentials::default().require().unwrap_err();
        match err {
            ConfigError::MissingCredentials(names) => assert_eq!(
                names,
                vec![PRACTICUM_TOKEN_ENV, TELEGRAM_TOKEN_ENV, TELEGRAM_CHAT_ID_ENV]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let shown = format!("{:?}", full().require().unwrap());
        assert!(!shown.contains("\"p\""));
        assert!(!shown.contains("\"t\""));
        assert!(shown.contains("42"));
    }

    #[test]
    fn test_config_dir_override() {
        let custom = std::env::temp_dir().join("homework-bot-config-test");
        std::env::set_var(CONFIG_DIR_ENV, &custom);

        assert_eq!(config_dir(), custom);
        assert_eq!(env_file(), custom.join(".env"));

        std::env::remove_var(CONFIG_DIR_ENV);
        let fallback = config_dir();
        assert!(fallback.ends_with(DEFAULT_CONFIG_DIR));
        assert_eq!(env_file(), fallback.join(".env"));
    }

    #[test]
    fn test_default_config() {
        let config = PollerConfig::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry_interval, Duration::from_secs(600));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_config_builder() {
        let config = PollerConfig::new()
            .with_endpoint("http://localhost/api")
            .with_retry_interval(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(2))
            .with_max_attempts(0);

        assert_eq!(config.endpoint, "http://localhost/api");
        assert_eq!(config.retry_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = PollerConfig::new()
            .with_backoff(Duration::from_secs(1), Duration::from_secs(5));

        assert_eq!(config.backoff_for(1), Duration::from_secs(1));
        assert_eq!(config.backoff_for(2), Duration::from_secs(2));
        assert_eq!(config.backoff_for(3), Duration::from_secs(4));
        assert_eq!(config.backoff_for(4), Duration::from_secs(5));
        assert_eq!(config.backoff_for(40), Duration::from_secs(5));
    }
}
