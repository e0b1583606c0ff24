//! Error types for remote store clients.

use thiserror::Error;

/// Failure while talking to a remote store or HTTP endpoint.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to launch '{program}': {source}. Hint: install the AWS CLI or pass its location explicitly")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed { program: String, status: String, stderr: String },

    #[error("unexpected output from '{program}': {reason}")]
    MalformedOutput { program: String, reason: String },

    #[error("invalid object address '{0}': expected s3://bucket/key or bucket/key")]
    InvalidObjectAddress(String),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl StoreError {
    pub fn malformed_output(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            program: program.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
