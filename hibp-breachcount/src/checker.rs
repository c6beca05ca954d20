use std::fmt;

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::Error;
use crate::range::{HashSplit, find_count};
use crate::source::{RangeClient, RangeSource};

/// Value reported in place of a count when a lookup could not complete.
pub const FAILED_SENTINEL: i64 = -1;

/// Outcome of a breach lookup.
///
/// `Count(0)` means the service answered and the password was not in it.
/// `Failed` means the answer is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    Count(u64),
    Failed,
}

impl LookupResult {
    /// The count as a signed integer, with `Failed` mapped to `-1`.
    pub fn sentinel(&self) -> i64 {
        match self {
            Self::Count(count) => i64::try_from(*count).unwrap_or(i64::MAX),
            Self::Failed => FAILED_SENTINEL,
        }
    }

    pub fn count(&self) -> Option<u64> {
        match self {
            Self::Count(count) => Some(*count),
            Self::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// True when the service reported at least one occurrence.
    pub fn is_breached(&self) -> bool {
        matches!(self, Self::Count(count) if *count > 0)
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Failed => write!(f, "{FAILED_SENTINEL}"),
        }
    }
}

/// Checks passwords against a range source using the k-anonymity split.
///
/// Only the 5-character hash prefix is handed to the source. The suffix is
/// matched locally against the returned candidates.
#[derive(Debug, Clone)]
pub struct BreachChecker<S> {
    source: S,
}

impl BreachChecker<RangeClient> {
    /// Creates a checker backed by the HTTPS range API.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self::new(RangeClient::new(config)?))
    }
}

impl<S: RangeSource> BreachChecker<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Looks up `secret` and returns its breach count, propagating any
    /// transport or parse error.
    #[instrument(level = "debug", skip_all)]
    pub async fn try_lookup(&self, secret: &str) -> Result<u64, Error> {
        let split = HashSplit::for_secret(secret);
        let prefix = split.prefix();

        debug!(prefix, "querying range");
        let body = self.source.fetch_range(prefix).await?;

        let count = find_count(&body, split.suffix())?;
        debug!(prefix, candidates = body.lines().count(), matched = count > 0, "range scanned");

        Ok(count)
    }

    /// Looks up `secret`, absorbing every failure into [`LookupResult::Failed`].
    pub async fn lookup(&self, secret: &str) -> LookupResult {
        match self.try_lookup(secret).await {
            Ok(count) => LookupResult::Count(count),
            Err(e) => {
                warn!(error = %e, "breach lookup failed");
                LookupResult::Failed
            }
        }
    }
}
