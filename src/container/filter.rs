use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::pod::{ContainerStatus, PodList};

use super::ContainerID;
use super::policy::{ExclusionPolicy, exclusion_policy};
use super::utils::non_empty;

/// Decides which containers of a pod list snapshot are excluded from metric collection.
///
/// Built once per collection cycle and never mutated afterwards, so a single filter can
/// be shared between threads.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use kubelet_common::container::ContainerFilter;
/// # use kubelet_common::pod::PodList;
/// let podlist = PodList::from_slice(br#"{"items": [{"status": {"containerStatuses": [
///     {"containerID": "docker://c1", "name": "nginx", "image": "nginx:latest"}
/// ]}}]}"#).unwrap();
/// let filter = ContainerFilter::with_policy(&podlist, Arc::new(|_: &str, _: &str| false));
/// assert!(!filter.is_excluded("docker://c1"));
/// assert!(!filter.is_excluded("c1"));
/// assert!(filter.is_excluded("system.slice"));
/// ```
pub struct ContainerFilter {
    containers: HashMap<ContainerID, Arc<ContainerStatus>>,
    policy: Arc<dyn ExclusionPolicy>,
}

impl ContainerFilter {
    /// Indexes the container statuses of `podlist` using the process-wide exclusion policy.
    pub fn new(podlist: &PodList) -> Self {
        Self::with_policy(podlist, exclusion_policy())
    }

    /// Indexes the container statuses of `podlist` using the given exclusion policy.
    ///
    /// Statuses without a container ID are skipped. IDs carrying a runtime scheme are
    /// registered a second time without it, since cAdvisor reports bare IDs.
    pub fn with_policy(podlist: &PodList, policy: Arc<dyn ExclusionPolicy>) -> Self {
        let mut containers = HashMap::new();

        for status in podlist.pods().flat_map(|pod| pod.container_statuses()) {
            let Some(container_id) = status
                .container_id()
                .and_then(|id| ContainerID::new(id).ok())
            else {
                continue;
            };

            log::trace!("indexing container: container_id={}", container_id);
            let status = Arc::new(status.clone());
            let alias = container_id.alias();
            containers.insert(container_id, Arc::clone(&status));
            if let Some(alias) = alias {
                containers.insert(alias, status);
            }
        }

        log::debug!("container filter indexed {} container ids", containers.len());
        Self { containers, policy }
    }

    /// Returns `true` if metrics for the given container ID should be dropped.
    ///
    /// Unknown IDs are excluded, since they belong to cgroups that are not containers
    /// (e.g. system slices). Known containers without a name or image are excluded as
    /// invalid. All others are decided by the exclusion policy.
    pub fn is_excluded(&self, container_id: &str) -> bool {
        let Some(status) = self.containers.get(container_id) else {
            return true;
        };

        match (non_empty(status.name()), non_empty(status.image())) {
            (Some(name), Some(image)) => self.policy.is_excluded(name, image),
            _ => true,
        }
    }

    /// Returns the indexed status for the given container ID, with or without scheme.
    pub fn get(&self, container_id: &str) -> Option<&ContainerStatus> {
        self.containers.get(container_id).map(Arc::as_ref)
    }

    /// Iterates over all indexed IDs, including scheme-less aliases.
    pub fn container_ids(&self) -> impl Iterator<Item = &ContainerID> {
        self.containers.keys()
    }

    /// Number of indexed IDs, counting scheme-less aliases separately.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

impl fmt::Debug for ContainerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerFilter")
            .field("containers", &self.containers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::container::NoExclusion;

    const EXAMPLE_PODLIST: &str = r#"{"items": [{
        "metadata": {"uid": "u1"},
        "status": {"containerStatuses": [
            {"containerID": "docker://c1", "name": "nginx", "image": "nginx:latest"}
        ]}
    }]}"#;

    fn podlist(json: &str) -> PodList {
        PodList::from_slice(json.as_bytes()).unwrap()
    }

    /// Records every call and answers with a fixed verdict.
    struct RecordingPolicy {
        verdict: bool,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingPolicy {
        fn new(verdict: bool) -> Arc<Self> {
            Arc::new(Self {
                verdict,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ExclusionPolicy for RecordingPolicy {
        fn is_excluded(&self, name: &str, image: &str) -> bool {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_owned(), image.to_owned()));
            self.verdict
        }
    }

    #[test]
    fn test_delegates_to_policy() {
        let policy = RecordingPolicy::new(false);
        let filter = ContainerFilter::with_policy(&podlist(EXAMPLE_PODLIST), policy.clone());

        assert!(!filter.is_excluded("c1"));
        assert_eq!(
            policy.calls(),
            vec![("nginx".to_owned(), "nginx:latest".to_owned())]
        );
    }

    #[test]
    fn test_policy_verdict_is_returned_unchanged() {
        let policy = RecordingPolicy::new(true);
        let filter = ContainerFilter::with_policy(&podlist(EXAMPLE_PODLIST), policy);
        assert!(filter.is_excluded("c1"));
        assert!(filter.is_excluded("docker://c1"));
    }

    #[test]
    fn test_unknown_container_is_excluded() {
        let policy = RecordingPolicy::new(false);
        let filter = ContainerFilter::with_policy(&podlist(EXAMPLE_PODLIST), policy.clone());

        assert!(filter.is_excluded("unknown"));
        assert!(filter.is_excluded(""));
        assert!(filter.is_excluded("/kubepods/burstable"));
        assert!(policy.calls().is_empty());
    }

    #[test]
    fn test_prefixed_and_bare_ids_resolve_identically() {
        let filter = ContainerFilter::with_policy(
            &podlist(
                r#"{"items": [{"status": {"containerStatuses": [
                    {"containerID": "docker://abc123", "name": "app", "image": "app:1"},
                    {"containerID": "containerd://def456", "name": "db", "image": "excluded:1"}
                ]}}]}"#,
            ),
            Arc::new(|_: &str, image: &str| image.starts_with("excluded")),
        );

        assert_eq!(filter.len(), 4);
        assert_eq!(
            filter.is_excluded("docker://abc123"),
            filter.is_excluded("abc123")
        );
        assert!(!filter.is_excluded("abc123"));
        assert_eq!(
            filter.is_excluded("containerd://def456"),
            filter.is_excluded("def456")
        );
        assert!(filter.is_excluded("def456"));
        assert_eq!(filter.get("abc123"), filter.get("docker://abc123"));
    }

    #[test]
    fn test_invalid_containers_are_excluded() {
        let policy = RecordingPolicy::new(false);
        let filter = ContainerFilter::with_policy(
            &podlist(
                r#"{"items": [{"status": {"containerStatuses": [
                    {"containerID": "docker://no-image", "name": "app"},
                    {"containerID": "docker://no-name", "image": "app:1"},
                    {"containerID": "docker://empty-image", "name": "app", "image": ""}
                ]}}]}"#,
            ),
            policy.clone(),
        );

        assert!(filter.is_excluded("no-image"));
        assert!(filter.is_excluded("docker://no-name"));
        assert!(filter.is_excluded("empty-image"));
        assert!(policy.calls().is_empty());
    }

    #[test]
    fn test_skips_statuses_without_container_id() {
        let filter = ContainerFilter::with_policy(
            &podlist(
                r#"{"items": [
                    {"status": {"containerStatuses": [
                        {"name": "waiting", "image": "app:1"},
                        {"containerID": "", "name": "empty", "image": "app:1"},
                        {"containerID": "bare", "name": "bare", "image": "app:1"}
                    ]}},
                    {"status": {}},
                    {}
                ]}"#,
            ),
            Arc::new(NoExclusion),
        );

        assert_eq!(filter.len(), 1);
        assert!(!filter.is_excluded("bare"));
        assert_eq!(filter.get("bare").and_then(ContainerStatus::name), Some("bare"));
    }

    #[test]
    fn test_malformed_entries_do_not_prevent_indexing() {
        let filter = ContainerFilter::with_policy(
            &podlist(
                r#"{"items": [
                    {"metadata": {"uid": 42}, "status": {"containerStatuses": [
                        {"containerID": 5, "name": "bad", "image": "bad:1"}
                    ]}},
                    null,
                    {"status": {"containerStatuses": [
                        {"containerID": "docker://c1", "name": "nginx", "image": "nginx:latest"},
                        {"containerID": "docker://c2", "name": "app", "image": 3}
                    ]}}
                ]}"#,
            ),
            Arc::new(NoExclusion),
        );

        assert_eq!(filter.len(), 4);
        assert!(!filter.is_excluded("c1"));
        assert!(filter.is_excluded("c2"));
        assert!(filter.is_excluded("5"));
    }

    #[test]
    fn test_empty_podlists() {
        for json in ["{}", r#"{"items": null}"#, r#"{"items": []}"#] {
            let filter = ContainerFilter::with_policy(&podlist(json), Arc::new(NoExclusion));
            assert!(filter.is_empty());
            assert!(filter.is_excluded("c1"));
        }
    }

    #[test]
    fn test_process_wide_policy_fallback() {
        let filter = ContainerFilter::new(&podlist(EXAMPLE_PODLIST));
        assert_eq!(filter.container_ids().count(), 2);
        assert!(filter.is_excluded("unknown"));
    }

    #[test]
    fn test_filter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ContainerFilter>();
    }
}
