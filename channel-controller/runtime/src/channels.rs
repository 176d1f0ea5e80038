use crate::{core, k8s};
use anyhow::Result;
use k8s::ResourceExt;

/// Lists the channels stored in a namespace.
#[async_trait::async_trait]
pub trait ListChannels {
    async fn list_channels(&self, ns: &str) -> Result<Vec<k8s::Channel>>;
}

#[async_trait::async_trait]
impl ListChannels for k8s::Client {
    async fn list_channels(&self, ns: &str) -> Result<Vec<k8s::Channel>> {
        let api = k8s::Api::<k8s::Channel>::namespaced(self.clone(), ns);
        let list = api.list(&k8s::ListParams::default()).await?;
        Ok(list.items)
    }
}

/// Converts a channel resource into its admission view.
///
/// `ns` is used when the object's metadata carries no namespace, as is the
/// case for objects in create requests.
pub fn to_core(ns: &str, name: String, spec: &k8s::ChannelSpec) -> core::Channel {
    core::Channel {
        name,
        namespace: ns.to_string(),
        channel_type: spec.channel_type.clone(),
        pathname: spec.pathname.clone(),
        config_map_ref: spec.config_map_ref.as_ref().map(|r| r.name.clone()),
    }
}

pub(crate) fn siblings(ns: &str, candidate: &str, channels: Vec<k8s::Channel>) -> Vec<core::Channel> {
    channels
        .into_iter()
        .filter_map(|ch| {
            let name = ch.name_any();
            if name == candidate {
                return None;
            }
            let ns = ch.namespace().unwrap_or_else(|| ns.to_string());
            Some(to_core(&ns, name, &ch.spec))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_channel(ns: &str, name: &str, channel_type: &str) -> k8s::Channel {
        let mut ch = k8s::Channel::new(name, k8s::ChannelSpec::new(channel_type, ns));
        ch.metadata.namespace = Some(ns.to_string());
        ch
    }

    #[test]
    fn excludes_candidate_from_siblings() {
        let channels = vec![
            mk_channel("default", "ch1", "NamespaceMirror"),
            mk_channel("default", "ch2", "Git"),
        ];
        let siblings = siblings("default", "ch1", channels);
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].name, "ch2");
        assert_eq!(siblings[0].channel_type, "Git");
    }

    #[test]
    fn converts_config_map_ref() {
        let mut spec = k8s::ChannelSpec::new("PackageRepo", "http://repo.example/charts");
        spec.config_map_ref = Some(k8s::ObjectRef {
            name: "repo-config".to_string(),
            ..Default::default()
        });
        let ch = to_core("default", "repo".to_string(), &spec);
        assert_eq!(ch.config_map_ref.as_deref(), Some("repo-config"));
        assert_eq!(ch.namespace, "default");
        assert!(ch.class().is_restricted());
    }
}
