//! URL resolution utilities.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Only what the loader needs: turning the `href` of a
//! `<link rel="stylesheet">` into an absolute address relative to the
//! document it appeared in.

/// Schemes treated as already-absolute references.
const ABSOLUTE_PREFIXES: [&str; 4] = ["http://", "https://", "data:", "file:"];

/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// Protocol-relative (`//host/path`), absolute-path (`/path`), and
/// relative-path (`a/b.css`, `../b.css`) references are handled. Dot
/// segments in the resulting path are removed.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    let href = href.trim();

    // STEP 1: Already absolute.
    if ABSOLUTE_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
        return href.to_string();
    }

    // STEP 2: Resolve against base.
    let Some(base) = base_url else {
        return href.to_string();
    };

    let Some(scheme_end) = base.find("://") else {
        // Base is a plain filesystem path.
        if href.starts_with('/') {
            return remove_dot_segments(href);
        }
        let base_dir = base.rsplit_once('/').map_or("", |(dir, _)| dir);
        if base_dir.is_empty() {
            return remove_dot_segments(href);
        }
        return remove_dot_segments(&format!("{base_dir}/{href}"));
    };

    let scheme = &base[..scheme_end];
    let after_scheme = &base[scheme_end + 3..];
    let (authority, base_path) = after_scheme
        .find('/')
        .map_or((after_scheme, "/"), |i| (&after_scheme[..i], &after_scheme[i..]));

    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative URL - reuse the base scheme
        return format!("{scheme}://{rest}");
    }

    let path = if href.starts_with('/') {
        href.to_string()
    } else {
        // Drop query/fragment, then the last path segment of the base.
        let base_path = base_path
            .split(['?', '#'])
            .next()
            .unwrap_or(base_path);
        let dir = base_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        format!("{dir}/{href}")
    };

    format!("{scheme}://{authority}{}", remove_dot_segments(&path))
}

/// [RFC 3986 § 5.2.4 Remove Dot Segments](https://www.rfc-editor.org/rfc/rfc3986#section-5.2.4)
///
/// Collapse `.` and `..` segments. Query and fragment are left untouched.
fn remove_dot_segments(path: &str) -> String {
    let (path_part, suffix) = path
        .find(['?', '#'])
        .map_or((path, ""), |i| (&path[..i], &path[i..]));

    let absolute = path_part.starts_with('/');
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path_part.split('/').collect();
    let last_index = segments.len().saturating_sub(1);

    for (index, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {
                if index == last_index {
                    output.push("");
                }
            }
            ".." => {
                if output.last().is_some_and(|s| !s.is_empty()) {
                    let _ = output.pop();
                }
                if index == last_index {
                    output.push("");
                }
            }
            "" if index != 0 && index != last_index => {}
            other => output.push(other),
        }
    }

    let mut joined = output.join("/");
    if absolute && !joined.starts_with('/') {
        joined.insert(0, '/');
    }
    joined.push_str(suffix);
    joined
}
