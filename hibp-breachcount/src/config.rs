use std::env::VarError;
use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Base URL of the official Pwned Passwords service.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com/";

/// Environment variable name for overriding the range API base URL.
pub const HIBP_RANGE_URL_ENV: &str = "HIBP_RANGE_URL";

/// Environment variable holding the log filter for the binary.
pub const HIBP_LOG_ENV: &str = "HIBP_LOG";

/// Transport settings for [`RangeClient`](crate::RangeClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Range requests go to `{base_url}range/{PREFIX}`.
    pub base_url: Url,
    /// Ask the service to pad responses with zero-count rows.
    pub add_padding: bool,
    /// Whole-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            add_padding: false,
            timeout: None,
        }
    }
}

impl Config {
    /// Returns the default config with the base URL taken from `HIBP_RANGE_URL`
    /// when it is set.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_value(std::env::var(HIBP_RANGE_URL_ENV))
    }

    /// Applies the result of reading `HIBP_RANGE_URL`. Only an unset variable
    /// falls back to the default URL.
    pub fn from_env_value(value: Result<String, VarError>) -> Result<Self, Error> {
        let config = Self::default();
        match value {
            Ok(url) => config.with_base_url(&url),
            Err(VarError::NotPresent) => Ok(config),
            Err(source) => Err(Error::InvalidEnv { var: HIBP_RANGE_URL_ENV, source }),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, Error> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }
}

/// Parses a base URL, making sure its path ends in `/` so that `range/...`
/// is appended rather than replacing the last segment.
pub fn parse_base_url(url: &str) -> Result<Url, Error> {
    let mut parsed = Url::parse(url)
        .map_err(|source| Error::InvalidBaseUrl { url: url.to_string(), source })?;

    if parsed.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl {
            url: url.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }

    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}
