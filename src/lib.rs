use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use error::ResultOkLogExt;

/// Kubelet Common: helpers shared by the kubelet check of a monitoring agent.
///
/// This library resolves pod and container identity into tagger entities, converts
/// Kubernetes resource quantities into plain numbers, and decides which containers of
/// a pod list snapshot are excluded from metric collection.
pub mod container;
pub mod error;
pub mod pod;
pub mod quantity;
pub mod tagger;

/// Source type name reported with every kubelet metric and used as log target.
pub const SOURCE_TYPE: &str = "kubelet";

/// Default cAdvisor port. `0` means the standalone cAdvisor endpoint is disabled.
pub const CADVISOR_DEFAULT_PORT: u16 = 0;

/// Environment variable holding the path of the pod list to inspect.
const PODLIST_PATH_ENV: &str = "KUBELET_PODLIST_PATH";

/// Environment variable holding a comma-separated list of images to exclude.
const EXCLUDED_IMAGES_ENV: &str = "KUBELET_EXCLUDED_IMAGES";

/// Runs the pod list inspection tool.
///
/// Loads a pod list snapshot, builds a [`container::ContainerFilter`] from it and prints
/// the exclusion verdict of every indexed container id, followed by the static pods
/// that are still pending.
///
/// The pod list path is taken from the first command line argument, falling back to
/// `KUBELET_PODLIST_PATH`. If `KUBELET_EXCLUDED_IMAGES` is set, containers running one
/// of the listed images are excluded.
///
/// # Errors
///
/// Possible errors include:
/// - Missing pod list path.
/// - Failure to open or decode the pod list file.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(PODLIST_PATH_ENV))
        .map(PathBuf::from)
        .ok_or("missing pod list path: pass it as first argument or set `KUBELET_PODLIST_PATH`")?;

    if let Ok(images) = std::env::var(EXCLUDED_IMAGES_ENV) {
        let images: HashSet<String> = images
            .split(',')
            .map(str::trim)
            .filter(|image| !image.is_empty())
            .map(str::to_owned)
            .collect();
        log::debug!(target: SOURCE_TYPE, "excluding images: {:?}", images);
        container::install_exclusion_policy(Arc::new(move |_: &str, image: &str| {
            images.contains(image)
        }))
        .ok_log("failed to install exclusion policy");
    }

    log::debug!(target: SOURCE_TYPE, "Loading pod list from {}", path.display());
    let podlist = pod::PodList::from_path(&path)?;
    let filter = container::ContainerFilter::new(&podlist);
    log::info!(
        target: SOURCE_TYPE,
        "indexed {} container ids from {} pods",
        filter.len(),
        podlist.pods().count()
    );

    let mut container_ids: Vec<&str> = filter.container_ids().map(|id| id.as_ref()).collect();
    container_ids.sort_unstable();
    for container_id in container_ids {
        let verdict = if filter.is_excluded(container_id) {
            "excluded"
        } else {
            "included"
        };
        println!("{container_id}\t{verdict}");
    }

    for static_pod in podlist.pods().filter(|p| pod::is_static_pending_pod(p)) {
        match (static_pod.namespace(), static_pod.name()) {
            (Some(namespace), Some(name)) => println!("static pending pod: {namespace}/{name}"),
            _ => log::warn!(
                target: SOURCE_TYPE,
                "static pending pod without name: uid={:?}",
                static_pod.uid()
            ),
        }
    }

    Ok(())
}
