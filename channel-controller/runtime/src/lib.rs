#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use channel_controller_core as core;
pub use channel_controller_k8s_api as k8s;

mod admission;
mod args;
mod channels;
mod metrics;

pub use self::{
    admission::Admission,
    args::Args,
    channels::{to_core, ListChannels},
    metrics::AdmissionMetrics,
};
