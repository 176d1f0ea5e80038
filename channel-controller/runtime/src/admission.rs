use crate::{
    channels::{self, ListChannels},
    core,
    k8s::{Channel, ChannelSpec},
    metrics::AdmissionMetrics,
};
use anyhow::{anyhow, Result};
use futures::future;
use http_body_util::BodyExt;
use hyper::{http, Request, Response};
use kube::{
    core::{admission::Operation, DynamicObject},
    Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Validates channel creation and updates.
///
/// Siblings are listed from the cluster on every request and the decision is
/// made against that snapshot. Concurrent creates of the same restricted type
/// can both pass; the webhook does not serialize them.
#[derive(Clone)]
pub struct Admission<L> {
    channels: L,
    metrics: AdmissionMetrics,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[from] hyper::Error),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

type Review = kube::core::admission::AdmissionReview<DynamicObject>;
type AdmissionRequest = kube::core::admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = kube::core::admission::AdmissionResponse;
type AdmissionReview = kube::core::admission::AdmissionReview<DynamicObject>;

type Body = http_body_util::Full<bytes::Bytes>;

// === impl Admission ===

impl<L> tower::Service<Request<hyper::body::Incoming>> for Admission<L>
where
    L: ListChannels + Clone + Send + Sync + 'static,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<hyper::body::Incoming>) -> Self::Future {
        trace!(?req);
        if req.method() != http::Method::POST || req.uri().path() != "/" {
            return Box::pin(future::ok(
                Response::builder()
                    .status(http::StatusCode::NOT_FOUND)
                    .body(Body::default())
                    .expect("not found response must be valid"),
            ));
        }

        let admission = self.clone();
        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            json_response(admission.review(&bytes).await)
        })
    }
}

impl<L> Admission<L>
where
    L: ListChannels,
{
    pub fn new(channels: L, metrics: AdmissionMetrics) -> Self {
        Self { channels, metrics }
    }

    async fn review(&self, body: &[u8]) -> AdmissionReview {
        let review: Review = match serde_json::from_slice(body) {
            Ok(review) => review,
            Err(error) => {
                warn!(%error, "Failed to parse request body");
                return AdmissionResponse::invalid(error).into_review();
            }
        };
        trace!(?review);

        let rsp = match review.try_into() {
            Ok(req) => {
                debug!(?req);
                self.admit(req).await
            }
            Err(error) => {
                warn!(%error, "Invalid admission request");
                AdmissionResponse::invalid(error)
            }
        };
        debug!(?rsp);
        rsp.into_review()
    }

    async fn admit(&self, req: AdmissionRequest) -> AdmissionResponse {
        if is_kind::<Channel>(&req) {
            return self.admit_channel(req).await;
        }

        AdmissionResponse::invalid(format_args!(
            "unsupported resource type: {}.{}.{}",
            req.kind.group, req.kind.version, req.kind.kind
        ))
    }

    async fn admit_channel(&self, req: AdmissionRequest) -> AdmissionResponse {
        let rsp = AdmissionResponse::from(&req);

        // Removing a channel never creates a duplicate.
        if matches!(req.operation, Operation::Delete | Operation::Connect) {
            return rsp;
        }

        let req_ns = req.namespace.clone();
        let (obj, spec) = match parse_spec::<ChannelSpec>(req) {
            Ok(spec) => spec,
            Err(error) => {
                info!(%error, "Failed to parse Channel spec");
                return rsp.deny(error);
            }
        };

        let ns = obj.namespace().or(req_ns).unwrap_or_default();
        let name = obj.name_any();
        let candidate = channels::to_core(&ns, name.clone(), &spec);

        let siblings = match self.channels.list_channels(&ns).await {
            Ok(list) => channels::siblings(&ns, &name, list),
            Err(error) => {
                warn!(%error, %ns, %name, "Failed to list channels");
                return rsp.deny(format!("failed to list channels in namespace {ns}: {error}"));
            }
        };

        let verdict = core::admission::decide(&candidate, &siblings);
        self.metrics.record(candidate.class(), &verdict);
        match verdict {
            core::Verdict::Allow => {
                debug!(%ns, %name, channel_type = %candidate.channel_type, "Allowed");
                rsp
            }
            core::Verdict::Deny(error) => {
                info!(%error, %ns, %name, existing = %error.existing, "Denied");
                rsp.deny(error)
            }
        }
    }
}

fn is_kind<T>(req: &AdmissionRequest) -> bool
where
    T: Resource,
    T::DynamicType: Default,
{
    let dt = Default::default();
    req.kind.group.eq_ignore_ascii_case(&T::group(&dt))
        && req.kind.kind.eq_ignore_ascii_case(&T::kind(&dt))
}

fn json_response(rsp: AdmissionReview) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(&rsp)?;
    Ok(Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("admission review response must be valid"))
}

fn parse_spec<T: DeserializeOwned>(req: AdmissionRequest) -> Result<(DynamicObject, T)> {
    let obj = req
        .object
        .ok_or_else(|| anyhow!("admission request missing 'object'"))?;

    let spec = {
        let data = obj
            .data
            .get("spec")
            .cloned()
            .ok_or_else(|| anyhow!("admission request missing 'spec'"))?;
        serde_json::from_value(data)?
    };

    Ok((obj, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s;
    use anyhow::bail;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct StaticChannels(Arc<Vec<k8s::Channel>>);

    #[derive(Clone)]
    struct Unavailable;

    #[async_trait::async_trait]
    impl ListChannels for StaticChannels {
        async fn list_channels(&self, ns: &str) -> Result<Vec<k8s::Channel>> {
            Ok(self
                .0
                .iter()
                .filter(|ch| ch.namespace().as_deref() == Some(ns))
                .cloned()
                .collect())
        }
    }

    #[async_trait::async_trait]
    impl ListChannels for Unavailable {
        async fn list_channels(&self, _: &str) -> Result<Vec<k8s::Channel>> {
            bail!("connection refused")
        }
    }

    fn mk_channel(ns: &str, name: &str, channel_type: &str) -> k8s::Channel {
        let mut ch = k8s::Channel::new(name, k8s::ChannelSpec::new(channel_type, ns));
        ch.metadata.namespace = Some(ns.to_string());
        ch
    }

    fn admission(existing: Vec<k8s::Channel>) -> Admission<StaticChannels> {
        Admission::new(
            StaticChannels(Arc::new(existing)),
            AdmissionMetrics::default(),
        )
    }

    fn mk_review(
        operation: &str,
        kind: serde_json::Value,
        object: serde_json::Value,
    ) -> serde_json::Value {
        json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": kind,
                "resource": {
                    "group": "apps.open-cluster-management.io",
                    "version": "v1",
                    "resource": "channels",
                },
                "namespace": "default",
                "operation": operation,
                "userInfo": {
                    "username": "admin",
                },
                "object": object,
                "dryRun": false,
            },
        })
    }

    fn channel_review(operation: &str, name: &str, channel_type: &str) -> serde_json::Value {
        mk_review(
            operation,
            json!({
                "group": "apps.open-cluster-management.io",
                "version": "v1",
                "kind": "Channel",
            }),
            json!({
                "apiVersion": "apps.open-cluster-management.io/v1",
                "kind": "Channel",
                "metadata": {
                    "name": name,
                },
                "spec": {
                    "type": channel_type,
                    "pathname": "default",
                },
            }),
        )
    }

    async fn admit(
        admission: &Admission<impl ListChannels>,
        review: serde_json::Value,
    ) -> AdmissionResponse {
        let body = serde_json::to_vec(&review).expect("review must serialize");
        admission
            .review(&body)
            .await
            .response
            .expect("review must have a response")
    }

    // Existing channel type, candidate type, expected to be allowed.
    #[rstest]
    #[case("NamespaceMirror", "NamespaceMirror", false)]
    #[case("NamespaceMirror", "ObjectBucket", true)]
    #[case("NamespaceMirror", "Git", true)]
    #[case("Git", "Git", true)]
    #[case("Git", "GitHub", true)]
    #[case("Git", "ObjectBucket", true)]
    #[case("ObjectBucket", "ObjectBucket", false)]
    #[case("ObjectBucket", "PackageRepo", true)]
    #[case("PackageRepo", "PackageRepo", false)]
    #[tokio::test(flavor = "current_thread")]
    async fn admits_channel_creation(
        #[case] existing: &str,
        #[case] candidate: &str,
        #[case] allowed: bool,
    ) {
        let admission = admission(vec![mk_channel("default", "ch1", existing)]);
        let rsp = admit(&admission, channel_review("CREATE", "dup", candidate)).await;
        assert_eq!(rsp.allowed, allowed, "{existing} then {candidate}");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn deny_carries_reason() {
        let admission = admission(vec![mk_channel("default", "ch1", "NamespaceMirror")]);
        let rsp = admit(&admission, channel_review("CREATE", "dup", "NamespaceMirror")).await;
        assert!(!rsp.allowed);
        assert_eq!(
            rsp.result.message,
            "duplicate channel of type NamespaceMirror in namespace default"
        );
        assert_eq!(admission.metrics.count("restricted", "deny"), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn ignores_channels_in_other_namespaces() {
        let admission = admission(vec![mk_channel("other", "ch1", "NamespaceMirror")]);
        let rsp = admit(&admission, channel_review("CREATE", "dup", "NamespaceMirror")).await;
        assert!(rsp.allowed);
        assert_eq!(admission.metrics.count("restricted", "allow"), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn allows_update_of_existing_channel() {
        let admission = admission(vec![mk_channel("default", "ch1", "ObjectBucket")]);
        let rsp = admit(&admission, channel_review("UPDATE", "ch1", "ObjectBucket")).await;
        assert!(rsp.allowed);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn denies_when_channels_cannot_be_listed() {
        let admission = Admission::new(Unavailable, AdmissionMetrics::default());
        let rsp = admit(&admission, channel_review("CREATE", "ch1", "Git")).await;
        assert!(!rsp.allowed);
        assert!(rsp.result.message.contains("connection refused"));
    }

    #[rstest]
    #[case("DELETE")]
    #[case("CONNECT")]
    #[tokio::test(flavor = "current_thread")]
    async fn allows_channel_deletion(#[case] operation: &str) {
        let admission = Admission::new(Unavailable, AdmissionMetrics::default());
        let review = mk_review(
            operation,
            json!({
                "group": "apps.open-cluster-management.io",
                "version": "v1",
                "kind": "Channel",
            }),
            serde_json::Value::Null,
        );
        let rsp = admit(&admission, review).await;
        assert!(rsp.allowed, "{operation} must be allowed");
        assert_eq!(admission.metrics.count("restricted", "deny"), 0);
        assert_eq!(admission.metrics.count("unrestricted", "deny"), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn denies_channel_without_spec() {
        let admission = admission(vec![]);
        let review = mk_review(
            "CREATE",
            json!({
                "group": "apps.open-cluster-management.io",
                "version": "v1",
                "kind": "Channel",
            }),
            json!({
                "apiVersion": "apps.open-cluster-management.io/v1",
                "kind": "Channel",
                "metadata": { "name": "ch1" },
            }),
        );
        let rsp = admit(&admission, review).await;
        assert!(!rsp.allowed);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejects_unsupported_kind() {
        let admission = admission(vec![]);
        let review = mk_review(
            "CREATE",
            json!({ "group": "", "version": "v1", "kind": "ConfigMap" }),
            json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": { "name": "cm" },
            }),
        );
        let rsp = admit(&admission, review).await;
        assert!(!rsp.allowed);
        assert!(rsp.result.message.contains("unsupported resource type"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejects_malformed_review() {
        let admission = admission(vec![]);
        let review = admission.review(b"{not json").await;
        let rsp = review.response.expect("review must have a response");
        assert!(!rsp.allowed);
    }
}
