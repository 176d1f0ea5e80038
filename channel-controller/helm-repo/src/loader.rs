use crate::{Error, TrustConfig};
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// The index document's file name under a repository locator.
pub const INDEX_FILE_NAME: &str = "index.yaml";

/// Retrieves the raw bytes of a repository index.
///
/// Implementations read the document to completion and release the
/// underlying response or file before returning.
#[async_trait::async_trait]
pub trait LoadIndex {
    async fn load(&self, locator: &str, trust: TrustConfig) -> Result<Bytes, Error>;
}

/// Fetches `<locator>/index.yaml` over HTTP(S).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteLoader;

/// Reads `<locator>/index.yaml` from the filesystem.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalLoader;

/// A loader chosen from a locator's scheme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Loader {
    Remote(RemoteLoader),
    Local(LocalLoader),
}

/// Returns the index URL for a repository base URL.
pub fn build_repo_url(base: &str) -> String {
    let mut url = base.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(INDEX_FILE_NAME);
    url
}

/// Picks a loader from the locator's scheme.
pub fn loader_for(locator: &str) -> Loader {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        Loader::Remote(RemoteLoader)
    } else {
        Loader::Local(LocalLoader)
    }
}

#[async_trait::async_trait]
impl LoadIndex for Loader {
    async fn load(&self, locator: &str, trust: TrustConfig) -> Result<Bytes, Error> {
        match self {
            Self::Remote(remote) => remote.load(locator, trust).await,
            Self::Local(local) => local.load(locator, trust).await,
        }
    }
}

// === impl RemoteLoader ===

impl RemoteLoader {
    fn client(trust: TrustConfig) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(trust.insecure_skip_verify)
            .build()
    }
}

#[async_trait::async_trait]
impl LoadIndex for RemoteLoader {
    async fn load(&self, locator: &str, trust: TrustConfig) -> Result<Bytes, Error> {
        let url = build_repo_url(locator);
        debug!(%url, insecure_skip_verify = trust.insecure_skip_verify, "Fetching index");

        let client = match Self::client(trust) {
            Ok(client) => client,
            Err(source) => return Err(Error::Client { url, source }),
        };

        let rsp = match client.get(&url).send().await {
            Ok(rsp) => rsp,
            Err(source) => return Err(Error::Fetch { url, source }),
        };

        let status = rsp.status();
        if !status.is_success() {
            return Err(Error::Status { url, status });
        }

        rsp.bytes().await.map_err(|source| Error::Read { url, source })
    }
}

// === impl LocalLoader ===

#[async_trait::async_trait]
impl LoadIndex for LocalLoader {
    async fn load(&self, locator: &str, _: TrustConfig) -> Result<Bytes, Error> {
        let path = Path::new(locator).join(INDEX_FILE_NAME);
        debug!(path = %path.display(), "Reading index");

        match tokio::fs::read(&path).await {
            Ok(buf) => Ok(Bytes::from(buf)),
            Err(source) => Err(Error::Open { path, source }),
        }
    }
}
