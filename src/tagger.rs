//! Tag resolution for pods and containers.
//!
//! Tags are resolved by the host agent's tagger. This module only builds the entity
//! URIs the tagger understands and forwards the requested [`Cardinality`].
//!
//! The tagger is passed to each call, since callers resolving tags already hold the
//! host's tagger handle. The container exclusion policy is instead bound process-wide
//! (see [`crate::container::install_exclusion_policy`]), because filters are rebuilt every
//! collection cycle through [`crate::container::ContainerFilter::new`], which takes
//! only the pod list.
use std::fmt;
use std::str::FromStr;

/// Entity prefix for pods, followed by the pod uid.
pub const POD_ENTITY_PREFIX: &str = "kubernetes_pod://";

/// Entity prefix for docker containers, followed by the container id.
pub const DOCKER_ENTITY_PREFIX: &str = "docker://";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown tag cardinality: {0}")]
    UnknownCardinality(String),
}

/// Detail level of resolved tags. Higher cardinality attaches more tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Low,
    Orchestrator,
    High,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::Low => "low",
            Cardinality::Orchestrator => "orchestrator",
            Cardinality::High => "high",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = Error;

    /// Parses a cardinality name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Cardinality::Low, Cardinality::Orchestrator, Cardinality::High]
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCardinality(s.to_owned()))
    }
}

/// Resolves an entity URI into tags.
///
/// Implemented by the host agent. Resolution failures are the tagger's concern; an
/// unknown entity simply yields no tags.
pub trait Tagger: Send + Sync {
    fn tags(&self, entity: &str, cardinality: Cardinality) -> Vec<String>;
}

impl<F> Tagger for F
where
    F: Fn(&str, Cardinality) -> Vec<String> + Send + Sync,
{
    fn tags(&self, entity: &str, cardinality: Cardinality) -> Vec<String> {
        self(entity, cardinality)
    }
}

/// Builds the tagger entity URI of a pod.
pub fn pod_entity(pod_uid: &str) -> String {
    format!("{POD_ENTITY_PREFIX}{pod_uid}")
}

/// Builds the tagger entity URI of a docker container.
pub fn docker_entity(container_id: &str) -> String {
    format!("{DOCKER_ENTITY_PREFIX}{container_id}")
}

/// Returns the tags of the pod with the given uid.
///
/// # Examples
///
/// ```
/// # use kubelet_common::tagger::{Cardinality, tags_for_pod};
/// let tagger = |entity: &str, _: Cardinality| vec![format!("entity:{entity}")];
/// assert_eq!(
///     tags_for_pod(&tagger, "u1", Cardinality::Low),
///     vec!["entity:kubernetes_pod://u1".to_owned()]
/// );
/// ```
pub fn tags_for_pod(tagger: &dyn Tagger, pod_uid: &str, cardinality: Cardinality) -> Vec<String> {
    tagger.tags(&pod_entity(pod_uid), cardinality)
}

/// Returns the tags of the docker container with the given id.
///
/// `container_id` is the bare runtime id, without `docker://` scheme.
pub fn tags_for_docker(
    tagger: &dyn Tagger,
    container_id: &str,
    cardinality: Cardinality,
) -> Vec<String> {
    tagger.tags(&docker_entity(container_id), cardinality)
}
