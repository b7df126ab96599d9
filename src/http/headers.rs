//! Literal replacement inside response header values.

use http::header::{HeaderMap, HeaderValue};
use memchr::memmem;

/// Replace every occurrence of `search` with `replacement` in every value of
/// `headers`, repeated headers included. Returns how many values changed.
///
/// A value whose replacement would not be a valid header is left as is.
pub fn replace_in_values(headers: &mut HeaderMap, search: &str, replacement: &str) -> usize {
    if search.is_empty() {
        return 0;
    }
    let finder = memmem::Finder::new(search);
    let mut changed = 0;

    for (name, value) in headers.iter_mut() {
        let bytes = value.as_bytes();
        if finder.find(bytes).is_none() {
            continue;
        }

        let mut out = Vec::with_capacity(bytes.len());
        let mut pos = 0;
        for start in finder.find_iter(bytes) {
            out.extend_from_slice(&bytes[pos..start]);
            out.extend_from_slice(replacement.as_bytes());
            pos = start + search.len();
        }
        out.extend_from_slice(&bytes[pos..]);

        match HeaderValue::from_bytes(&out) {
            Ok(mut rewritten) => {
                rewritten.set_sensitive(value.is_sensitive());
                *value = rewritten;
                changed += 1;
            }
            Err(_) => tracing::warn!(header = %name, "rewritten header value is invalid, kept original"),
        }
    }

    changed
}
