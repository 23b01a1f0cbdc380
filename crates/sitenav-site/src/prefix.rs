//! Path prefix matching shared by locale and sidebar lookup.

use std::borrow::Cow;

/// Make a requested path absolute.
pub(crate) fn request_path(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Whether `prefix` covers `path`.
///
/// A directory prefix such as `/zh-CN/` also covers the bare `/zh-CN`.
pub(crate) fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
        || prefix
            .strip_suffix('/')
            .is_some_and(|bare| !bare.is_empty() && path == bare)
}

/// Select the longest key in `entries` that covers `path`.
pub(crate) fn longest_match<'a, V>(
    entries: impl IntoIterator<Item = (&'a String, &'a V)>,
    path: &str,
) -> Option<(&'a str, &'a V)> {
    entries
        .into_iter()
        .filter(|(prefix, _)| matches_prefix(path, prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(prefix, value)| (prefix.as_str(), value))
}

/// Whether two page paths name the same page, ignoring a trailing slash.
pub(crate) fn same_page(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
