use std::path::PathBuf;
use thiserror::Error;

/// Failures retrieving or decoding a repository index. Each carries the
/// resolved locator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build HTTP client for {url}")]
    Client {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to contact repo: {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("repo {url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read body of {url}")]
    Read {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to unmarshal repo {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_yaml::Error,
    },
}

// === impl Error ===

impl Error {
    /// True when the repository was reached but its index is malformed.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == reqwest::StatusCode::NOT_FOUND,
            Self::Open { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
