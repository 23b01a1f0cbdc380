//! "Edit this page" links.
//!
//! Patterns use `:repo`, `:branch` and `:path` placeholders, e.g.
//! `:repo/edit/:branch/packages/docs/:path`.

/// Source file of a page, relative to the docs root.
///
/// Directory pages (`/guide/install/`) are backed by `README.md`.
pub(crate) fn source_path(page_path: &str) -> String {
    let relative = page_path.trim_start_matches('/');
    if relative.is_empty() || relative.ends_with('/') {
        format!("{relative}README.md")
    } else if relative.ends_with(".md") {
        relative.to_owned()
    } else {
        format!("{relative}.md")
    }
}

/// Expand an edit link pattern for `page_path`.
///
/// Returns `None` when the pattern needs a repository and none is set.
pub(crate) fn expand(
    pattern: &str,
    repo: Option<&str>,
    branch: &str,
    page_path: &str,
) -> Option<String> {
    let mut url = pattern.to_owned();
    if url.contains(":repo") {
        url = url.replace(":repo", repo?.trim_end_matches('/'));
    }
    Some(
        url.replace(":branch", branch)
            .replace(":path", &source_path(page_path)),
    )
}
