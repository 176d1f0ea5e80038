#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod admission;
mod channel_type;

pub use self::{
    admission::{DuplicateChannel, Verdict},
    channel_type::{classify, ChannelTypeClass, RestrictedType},
};

/// A channel as seen by admission: identity, declared type and source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Channel {
    pub name: String,
    pub namespace: String,

    /// The declared type. Any string is accepted; see [`classify`].
    pub channel_type: String,

    /// Where the channel's content lives (URL, directory or namespace).
    pub pathname: String,

    /// Name of the ConfigMap holding the channel's free-form configuration.
    pub config_map_ref: Option<String>,
}

// === impl Channel ===

impl Channel {
    pub fn new(
        namespace: impl ToString,
        name: impl ToString,
        channel_type: impl ToString,
        pathname: impl ToString,
    ) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            channel_type: channel_type.to_string(),
            pathname: pathname.to_string(),
            config_map_ref: None,
        }
    }

    #[inline]
    pub fn class(&self) -> ChannelTypeClass {
        classify(&self.channel_type)
    }
}
