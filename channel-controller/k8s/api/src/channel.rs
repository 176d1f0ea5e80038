use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TYPE_NAMESPACE_MIRROR: &str = "NamespaceMirror";
pub const TYPE_OBJECT_BUCKET: &str = "ObjectBucket";
pub const TYPE_PACKAGE_REPO: &str = "PackageRepo";
pub const TYPE_GIT: &str = "Git";

/// Points subscribers at a source of deployable content.
#[derive(Clone, Debug, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "apps.open-cluster-management.io",
    version = "v1",
    kind = "Channel",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSpec {
    /// The declared channel type. Not a closed set; unknown values are kept
    /// as-is.
    #[serde(rename = "type")]
    pub channel_type: String,

    pub pathname: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ObjectRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_ref: Option<ObjectRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_namespaces: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gates: Option<ChannelGate>,
}

/// References another object, usually in the channel's own namespace.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Content must carry these annotations before it is promoted to the channel.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelGate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

// === impl ChannelSpec ===

impl ChannelSpec {
    pub fn new(channel_type: impl ToString, pathname: impl ToString) -> Self {
        Self {
            channel_type: channel_type.to_string(),
            pathname: pathname.to_string(),
            secret_ref: None,
            config_map_ref: None,
            source_namespaces: None,
            gates: None,
        }
    }
}
