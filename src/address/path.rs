//! Filesystem-style path joining for URL paths.

/// Join `tail` onto `base` and normalize the result.
///
/// Repeated separators collapse, `.` segments vanish and `..` pops a segment
/// (never above the root). A trailing separator on the joined input survives.
/// An empty `tail` leaves `base` as is, apart from normalization.
pub fn join_paths(base: &str, tail: &str) -> String {
    if tail.is_empty() {
        return normalize(base);
    }
    normalize(&format!("{}/{}", base, tail))
}

/// Normalize a `/`-separated path.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if !absolute => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    if trailing && !segments.is_empty() {
        out.push('/');
    }
    if out.is_empty() {
        out.push('.');
    }
    out
}
