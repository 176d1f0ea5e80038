#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Retrieval of package repository index documents.
//!
//! An index is fetched through a [`LoadIndex`] strategy, either over HTTP
//! ([`RemoteLoader`]) or from a local directory ([`LocalLoader`]), and then
//! decoded into a [`RepositoryIndex`]. Loading performs blocking-style I/O
//! and imposes no deadline of its own; callers wrap it in whatever timeout
//! suits them.

mod error;
pub mod index;
mod loader;
pub mod trust;

pub use self::{
    error::Error,
    index::{decode, ChartVersion, Dependency, Maintainer, RepositoryIndex},
    loader::{
        build_repo_url, loader_for, LoadIndex, Loader, LocalLoader, RemoteLoader, INDEX_FILE_NAME,
    },
    trust::{InvalidTrustConfig, TrustConfig, INSECURE_SKIP_VERIFY},
};
use std::collections::BTreeMap;
use tracing::{info, trace};

/// Loads and decodes the index at `locator`.
///
/// `config` is the channel's free-form configuration, consulted only for the
/// TLS trust policy.
pub async fn fetch_index<L>(
    loader: &L,
    locator: &str,
    config: Option<&BTreeMap<String, String>>,
) -> Result<RepositoryIndex, Error>
where
    L: LoadIndex + ?Sized,
{
    let trust = TrustConfig::resolve(config);
    let bytes = loader.load(locator, trust).await?;

    let url = build_repo_url(locator);
    info!(%url, "Done retrieving index");
    trace!(index = %String::from_utf8_lossy(&bytes));

    decode(&bytes).map_err(|source| Error::Decode { url, source })
}
