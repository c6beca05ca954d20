use std::num::ParseIntError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed for prefix {prefix}: {source}")]
    HttpRequest {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for prefix {prefix}")]
    HttpStatus { prefix: String, status: u16 },

    #[error("refusing to query with a {len}-byte prefix: expected 5 uppercase hex characters")]
    InvalidPrefix { len: usize },

    #[error("malformed range record {line}: missing ':' separator")]
    MalformedLine { line: usize },

    #[error("invalid count in range record {line}: {source}")]
    InvalidCount {
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid field {arg:?}, expected NAME=VALUE")]
    InvalidField { arg: String },

    #[error("{var} is not valid unicode")]
    InvalidEnv {
        var: &'static str,
        #[source]
        source: std::env::VarError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
