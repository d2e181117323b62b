use super::SCHEME_SEPARATOR;

/// Splits a container ID of the form `<scheme>://<id>` into its scheme and runtime-local ID.
///
/// Only the first occurrence of the separator is considered, so the runtime-local part may
/// itself contain `://`.
///
/// # Returns
///
/// `Some((scheme, id))` if the separator is present, otherwise `None`.
pub(super) fn split_scheme(src: &str) -> Option<(&str, &str)> {
    src.split_once(SCHEME_SEPARATOR)
}

/// Returns the value if it is present and not empty.
pub(super) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
