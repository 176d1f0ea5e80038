use crate::{mk_channel, with_temp_ns};
use channel_controller_k8s_api::Channel;

/// Creates a channel of type `existing` and then asserts that a second
/// channel of type `candidate` is admitted into the same namespace.
pub async fn accepts_after(existing: &'static str, candidate: &'static str) {
    with_temp_ns(move |client, ns| async move {
        let api = kube::Api::<Channel>::namespaced(client, &ns);
        let params = kube::api::PostParams::default();
        api.create(&params, &mk_channel(&ns, "ch1", existing))
            .await
            .expect("existing channel must apply");

        api.create(&params, &mk_channel(&ns, "dup-ch1", candidate))
            .await
            .expect("channel must apply");
    })
    .await;
}

/// Creates a channel of type `existing` and then asserts that a second
/// channel of type `candidate` is rejected.
pub async fn rejects_after(existing: &'static str, candidate: &'static str) {
    with_temp_ns(move |client, ns| async move {
        let api = kube::Api::<Channel>::namespaced(client, &ns);
        let params = kube::api::PostParams::default();
        api.create(&params, &mk_channel(&ns, "ch1", existing))
            .await
            .expect("existing channel must apply");

        api.create(&params, &mk_channel(&ns, "dup-ch1", candidate))
            .await
            .expect_err("channel must not apply");
    })
    .await;
}
