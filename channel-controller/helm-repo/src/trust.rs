use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// The configuration key that disables server certificate verification.
pub const INSECURE_SKIP_VERIFY: &str = "insecureSkipVerify";

/// TLS trust policy for remote index retrieval.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustConfig {
    pub insecure_skip_verify: bool,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid insecureSkipVerify value {value:?}: expected a boolean")]
pub struct InvalidTrustConfig {
    pub value: String,
}

// === impl TrustConfig ===

impl TrustConfig {
    /// Derives the trust policy from a channel's configuration.
    ///
    /// An unparsable value is logged and certificate verification stays on.
    pub fn resolve(config: Option<&BTreeMap<String, String>>) -> Self {
        Self::try_from_config(config).unwrap_or_else(|error| {
            warn!(%error, "Using default value: insecureSkipVerify=false");
            Self::default()
        })
    }

    pub fn try_from_config(
        config: Option<&BTreeMap<String, String>>,
    ) -> Result<Self, InvalidTrustConfig> {
        let value = match config.and_then(|c| c.get(INSECURE_SKIP_VERIFY)) {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(Self::default()),
        };

        let insecure_skip_verify = parse_bool(value).ok_or_else(|| InvalidTrustConfig {
            value: value.clone(),
        })?;
        Ok(Self {
            insecure_skip_verify,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
