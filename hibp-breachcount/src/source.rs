use std::future::Future;

use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::range::parse_prefix;

/// Header asking the range API to pad its response with zero-count rows.
pub const ADD_PADDING_HEADER: &str = "Add-Padding";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Something that can answer a range query for a 5-character hash prefix.
///
/// Implementations receive only the prefix and return the raw response body.
pub trait RangeSource {
    fn fetch_range(&self, prefix: &str) -> impl Future<Output = Result<String, Error>> + Send;
}

/// Queries the Pwned Passwords range API over HTTPS.
///
/// Each call issues exactly one request. Failures are returned as-is, there is
/// no retry.
#[derive(Debug, Clone)]
pub struct RangeClient {
    client: reqwest::Client,
    base_url: Url,
    add_padding: bool,
}

impl RangeClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::ClientBuild)?;

        Ok(Self::with_client(client, config))
    }

    /// Uses an existing `reqwest::Client`, e.g. to share a connection pool.
    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self { client, base_url: config.base_url.clone(), add_padding: config.add_padding }
    }

    /// Builds `{base_url}range/{PREFIX}`, refusing anything that is not a
    /// 5-character uppercase hex prefix.
    pub fn range_url(&self, prefix: &str) -> Result<Url, Error> {
        if parse_prefix(prefix).is_none() {
            return Err(Error::InvalidPrefix { len: prefix.len() });
        }

        self.base_url.join(&format!("range/{prefix}")).map_err(|source| Error::InvalidBaseUrl {
            url: self.base_url.to_string(),
            source,
        })
    }
}

impl RangeSource for RangeClient {
    async fn fetch_range(&self, prefix: &str) -> Result<String, Error> {
        let url = self.range_url(prefix)?;
        debug!(%url, padding = self.add_padding, "requesting range");

        let mut request = self.client.get(url);
        if self.add_padding {
            request = request.header(ADD_PADDING_HEADER, "true");
        }

        let response = request
            .send()
            .await
            .map_err(|source| Error::HttpRequest { prefix: prefix.to_string(), source })?;

        if response.status() != StatusCode::OK {
            return Err(Error::HttpStatus {
                prefix: prefix.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| Error::HttpRequest { prefix: prefix.to_string(), source })
    }
}
