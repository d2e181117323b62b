use std::sync::{Arc, OnceLock};

use super::{Error, Result};

/// Decides whether a container should be left out of metric collection.
///
/// Implementations are provided by the host agent. They must be cheap, in-process
/// checks, since the filter consults them once per observed container.
pub trait ExclusionPolicy: Send + Sync {
    /// Returns `true` if the container with the given name and image is excluded.
    fn is_excluded(&self, name: &str, image: &str) -> bool;
}

impl<F> ExclusionPolicy for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_excluded(&self, name: &str, image: &str) -> bool {
        self(name, image)
    }
}

/// Policy used when the host does not provide one: nothing is excluded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExclusion;

impl ExclusionPolicy for NoExclusion {
    fn is_excluded(&self, _name: &str, _image: &str) -> bool {
        false
    }
}

static POLICY: OnceLock<Arc<dyn ExclusionPolicy>> = OnceLock::new();

/// Binds the process-wide exclusion policy.
///
/// Must run before the first call to [`exclusion_policy`]; the binding cannot change
/// afterwards.
///
/// # Errors
///
/// Returns [`Error::PolicyAlreadyInstalled`] if a policy, including the [`NoExclusion`]
/// fallback, is already bound.
pub fn install_exclusion_policy(policy: Arc<dyn ExclusionPolicy>) -> Result<()> {
    POLICY
        .set(policy)
        .map_err(|_| Error::PolicyAlreadyInstalled)
}

/// Returns the process-wide exclusion policy.
///
/// If the host never installed one, [`NoExclusion`] is bound on first use.
pub fn exclusion_policy() -> Arc<dyn ExclusionPolicy> {
    Arc::clone(POLICY.get_or_init(|| {
        log::debug!("no container exclusion policy installed, excluding nothing");
        Arc::new(NoExclusion)
    }))
}
