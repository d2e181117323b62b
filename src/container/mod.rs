//! Container identity and exclusion filtering.
//!
//! A [`ContainerFilter`] is built from a single pod list snapshot and answers whether
//! metrics observed for a container ID should be dropped. Container IDs reported by the
//! kubelet carry a runtime scheme (`docker://<id>`, `containerd://<id>`) while cAdvisor
//! reports the bare ID, so the filter indexes both forms.
//!
//! The user-facing exclusion rules live behind the [`ExclusionPolicy`] trait. When the
//! host never installs one, [`NoExclusion`] is bound and nothing is excluded by policy.
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

mod error;
mod filter;
mod policy;
mod utils;

pub use error::{Error, Result};
pub use filter::ContainerFilter;
pub use policy::{ExclusionPolicy, NoExclusion, exclusion_policy, install_exclusion_policy};

/// Separator between the runtime scheme and the runtime-local container ID.
pub const SCHEME_SEPARATOR: &str = "://";

/// A validated, non-empty container identifier.
///
/// The identifier is kept exactly as reported, including an optional runtime scheme.
///
/// # Examples
///
/// ```
/// # use kubelet_common::container::ContainerID;
/// let id = ContainerID::new("docker://abc123").unwrap();
/// assert_eq!(id.scheme(), Some("docker"));
/// assert_eq!(id.short_id(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainerID`] if the input is empty.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() {
            return Err(Error::EmptyContainerID);
        }

        Ok(Self(src.into()))
    }

    /// Returns the runtime scheme (e.g. `docker`), if the ID carries one.
    pub fn scheme(&self) -> Option<&str> {
        utils::split_scheme(&self.0).map(|(scheme, _)| scheme)
    }

    /// Returns the ID without its runtime scheme.
    ///
    /// IDs without a scheme are returned unchanged.
    pub fn short_id(&self) -> &str {
        utils::split_scheme(&self.0)
            .map(|(_, id)| id)
            .unwrap_or(&*self.0)
    }

    /// Returns the scheme-less alias of this ID, if it differs from the ID itself.
    ///
    /// Yields `None` for IDs without a scheme and for IDs whose runtime-local part is empty.
    pub fn alias(&self) -> Option<ContainerID> {
        self.scheme()?;
        ContainerID::new(self.short_id()).ok()
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
