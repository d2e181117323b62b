/// Entry point for the kubelet pod list inspection tool.
///
/// Prints which containers of a kubelet pod list snapshot would be excluded from metric
/// collection, and which static pods are still pending.
///
/// # Errors
///
/// Returns an error if the pod list path is missing or the pod list cannot be loaded.
///
/// # Examples
///
/// ```bash
/// curl -sk https://localhost:10250/pods > pods.json
/// RUST_LOG=debug KUBELET_EXCLUDED_IMAGES=k8s.gcr.io/pause:3.1 cargo run -- pods.json
/// ```
fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    kubelet_common::run()
}
