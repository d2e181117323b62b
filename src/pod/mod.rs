//! Pod list records and lookups over a kubelet pod list snapshot.
//!
//! The records mirror the subset of the Kubernetes pod schema this crate reads. Lookups
//! never fail: any missing link along an access path yields the negative answer.
mod error;
mod lenient;
mod models;

pub use error::{Error, Result};
pub use models::{ContainerStatus, Pod, PodList, PodMetadata, PodStatus};

/// Annotation set by the kubelet to record where a pod manifest came from.
pub const CONFIG_SOURCE_ANNOTATION: &str = "kubernetes.io/config.source";

/// Config source of pods scheduled through the API server.
const API_CONFIG_SOURCE: &str = "api";

const PENDING_PHASE: &str = "Pending";

/// Returns the first pod in `podlist` whose `metadata.uid` equals `uid`.
///
/// Pods without metadata or uid are skipped.
///
/// # Examples
///
/// ```
/// # use kubelet_common::pod::{PodList, get_pod_by_uid};
/// let podlist = PodList::from_slice(br#"{"items": [{}, {"metadata": {"uid": "u1"}}]}"#).unwrap();
/// assert!(get_pod_by_uid("u1", &podlist).is_some());
/// assert!(get_pod_by_uid("u2", &podlist).is_none());
/// ```
pub fn get_pod_by_uid<'a>(uid: &str, podlist: &'a PodList) -> Option<&'a Pod> {
    podlist.pods().find(|pod| pod.uid() == Some(uid))
}

/// Returns `true` if the pod is a static pod that has not started any container yet.
///
/// Static pods are read from manifests by the kubelet itself, so their config source
/// annotation is present and differs from `api`. While pending, the kubelet reports no
/// `containerStatuses` for them at all.
/// See <https://github.com/kubernetes/kubernetes/pull/57106>.
pub fn is_static_pending_pod(pod: &Pod) -> bool {
    match pod.annotation(CONFIG_SOURCE_ANNOTATION) {
        Some(source) if source != API_CONFIG_SOURCE => {}
        _ => return false,
    }

    pod.phase() == Some(PENDING_PHASE) && !pod.has_container_statuses()
}
