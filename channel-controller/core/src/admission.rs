//! Per-namespace uniqueness of restricted channel types.
//!
//! The decision is made against a snapshot of the namespace's channels. The
//! snapshot and the eventual write of the candidate are not one transaction:
//! two concurrent creates of the same restricted type may both observe an
//! empty namespace and both be allowed. Callers that need strict exclusivity
//! must enforce it in the backing store.

use crate::{Channel, ChannelTypeClass, RestrictedType};
use thiserror::Error;

/// The outcome of an admission decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DuplicateChannel),
}

/// A restricted channel type already has an instance in the namespace.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("duplicate channel of type {channel_type} in namespace {namespace}")]
pub struct DuplicateChannel {
    pub channel_type: RestrictedType,
    pub namespace: String,

    /// The existing channel the candidate collides with.
    pub existing: String,
}

/// Decides whether `candidate` may be admitted alongside `siblings`.
///
/// `siblings` are the channels already stored in the candidate's namespace,
/// not including the candidate itself.
pub fn decide<'s>(candidate: &Channel, siblings: impl IntoIterator<Item = &'s Channel>) -> Verdict {
    let channel_type = match candidate.class() {
        ChannelTypeClass::Unrestricted => return Verdict::Allow,
        ChannelTypeClass::Restricted(t) => t,
    };

    let existing = siblings.into_iter().find(|sibling| {
        sibling.namespace == candidate.namespace && sibling.channel_type == candidate.channel_type
    });

    match existing {
        Some(existing) => Verdict::Deny(DuplicateChannel {
            channel_type,
            namespace: candidate.namespace.clone(),
            existing: existing.name.clone(),
        }),
        None => Verdict::Allow,
    }
}

// === impl Verdict ===

impl Verdict {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn into_result(self) -> Result<(), DuplicateChannel> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(dup) => Err(dup),
        }
    }
}
