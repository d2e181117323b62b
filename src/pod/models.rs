use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{Error, Result, lenient};

/// A pod list snapshot as served by the kubelet `/pods` endpoint.
///
/// Every field is optional. Missing, `null` or wrongly typed values decode to `None`,
/// malformed pods are dropped, and the accessors fall back to empty results instead of
/// failing.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct PodList {
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Option<Vec<Pod>>,
}

impl PodList {
    /// Decodes a pod list from a JSON reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the input is not a valid pod list document.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|source| Error::Decode { source })
    }

    /// Decodes a pod list from a JSON byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the input is not a valid pod list document.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kubelet_common::pod::PodList;
    /// let podlist = PodList::from_slice(br#"{"items": [{"metadata": {"uid": "u1"}}]}"#).unwrap();
    /// assert_eq!(podlist.pods().count(), 1);
    /// ```
    pub fn from_slice(src: &[u8]) -> Result<Self> {
        serde_json::from_slice(src).map_err(|source| Error::Decode { source })
    }

    /// Reads and decodes a pod list from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileOpen`] if the file cannot be opened, or [`Error::DecodeFile`]
    /// if its content is not a valid pod list document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::DecodeFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Iterates over all pods in the list. Yields nothing if `items` is missing.
    pub fn pods(&self) -> impl Iterator<Item = &Pod> {
        self.items.iter().flatten()
    }
}

/// A single pod record of the list.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct Pod {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub metadata: Option<PodMetadata>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub status: Option<PodStatus>,
}

impl Pod {
    /// Returns `metadata.uid`.
    pub fn uid(&self) -> Option<&str> {
        self.metadata.as_ref()?.uid.as_deref()
    }

    /// Returns `metadata.name`.
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref()?.name.as_deref()
    }

    /// Returns `metadata.namespace`.
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.as_ref()?.namespace.as_deref()
    }

    /// Returns the value of the given annotation, if the pod carries it.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .annotations
            .as_ref()?
            .get(key)
            .map(String::as_str)
    }

    /// Returns `status.phase`, e.g. `Pending` or `Running`.
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref()?.phase.as_deref()
    }

    /// Returns `true` if the pod status lists container statuses, even an empty list.
    pub fn has_container_statuses(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|status| status.container_statuses.is_some())
    }

    /// Iterates over the pod's container statuses. Yields nothing if the status or the
    /// status list is missing.
    pub fn container_statuses(&self) -> impl Iterator<Item = &ContainerStatus> {
        self.status
            .iter()
            .flat_map(|status| status.container_statuses.iter().flatten())
    }
}

/// Identity and annotations of a pod.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct PodMetadata {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub namespace: Option<String>,
    /// Annotations with string values. Entries with other values are dropped.
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub annotations: Option<HashMap<String, String>>,
}

/// Observed state of a pod.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub phase: Option<String>,
    /// `None` if the key is missing or `null`. A value that is not a list yields an
    /// empty list.
    #[serde(default, deserialize_with = "lenient::list")]
    pub container_statuses: Option<Vec<ContainerStatus>>,
}

/// Runtime status of a single container, as reported in `status.containerStatuses`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct ContainerStatus {
    #[serde(rename = "containerID", default, deserialize_with = "lenient::optional")]
    pub container_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub image: Option<String>,
}

impl ContainerStatus {
    /// Returns the container ID, usually prefixed with the runtime scheme.
    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    /// Returns the container name from the pod spec.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the image the container runs.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}
