//! The process-wide exclusion policy is bound once per process, so this file holds a
//! single test that owns the binding.
use std::sync::Arc;

use kubelet_common::container::{
    ContainerFilter, Error, ExclusionPolicy, NoExclusion, exclusion_policy,
    install_exclusion_policy,
};
use kubelet_common::pod::PodList;

const PODLIST: &str = r#"{"items": [{
    "metadata": {"uid": "u1"},
    "status": {"containerStatuses": [
        {"containerID": "docker://c1", "name": "nginx", "image": "nginx:latest"},
        {"containerID": "containerd://c2", "name": "pause", "image": "k8s.gcr.io/pause:3.1"}
    ]}
}]}"#;

#[test]
fn test_installed_policy_is_used_by_filter() {
    install_exclusion_policy(Arc::new(|_: &str, image: &str| {
        image.starts_with("k8s.gcr.io/pause")
    }))
    .expect("no policy bound before this test");

    let podlist = PodList::from_slice(PODLIST.as_bytes()).unwrap();
    let filter = ContainerFilter::new(&podlist);

    assert!(!filter.is_excluded("c1"));
    assert!(!filter.is_excluded("docker://c1"));
    assert!(filter.is_excluded("c2"));
    assert!(filter.is_excluded("containerd://c2"));
    assert!(filter.is_excluded("unknown"));

    assert!(exclusion_policy().is_excluded("pause", "k8s.gcr.io/pause:3.1"));
    assert!(matches!(
        install_exclusion_policy(Arc::new(NoExclusion)),
        Err(Error::PolicyAlreadyInstalled)
    ));
    assert!(filter.is_excluded("c2"));
}
