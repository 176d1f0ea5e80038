#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod channel;

pub use self::channel::{Channel, ChannelGate, ChannelSpec, ObjectRef};
pub use k8s_openapi::api::core::v1::Namespace;
pub use kube::{
    api::{Api, ListParams, ObjectMeta, ResourceExt},
    Client, Resource,
};
