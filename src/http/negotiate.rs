//! `Accept` header negotiation.

use http::header::{HeaderMap, ACCEPT};
use mime::Mime;

/// Whether a request with `headers` accepts `media_type`.
///
/// A request without `Accept` accepts anything. Otherwise the most specific
/// matching range (`type/subtype+suffix` over `type/*` over `*/*`) decides,
/// the higher quality breaking ties, and a `q=0` on that range rejects.
/// Unparseable entries are skipped.
pub fn accepts(headers: &HeaderMap, media_type: &Mime) -> bool {
    let mut present = false;
    let mut best: Option<(u8, f32)> = None;

    for value in headers.get_all(ACCEPT) {
        present = true;
        let Ok(value) = value.to_str() else {
            continue;
        };
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Ok(range) = entry.parse::<Mime>() else {
                continue;
            };
            let Some(specificity) = specificity(&range, media_type) else {
                continue;
            };
            let q = quality(&range);
            let better = best.map_or(true, |(current, current_q)| {
                specificity > current || (specificity == current && q > current_q)
            });
            if better {
                best = Some((specificity, q));
            }
        }
    }

    if !present {
        return true;
    }
    best.map_or(false, |(_, q)| q > 0.0)
}

/// Any of `media_types` is accepted.
pub fn accepts_any(headers: &HeaderMap, media_types: &[Mime]) -> bool {
    media_types.iter().any(|media_type| accepts(headers, media_type))
}

fn specificity(range: &Mime, media_type: &Mime) -> Option<u8> {
    if range.type_() == mime::STAR && range.subtype() == mime::STAR {
        return Some(0);
    }
    if range.type_() != media_type.type_() {
        return None;
    }
    if range.subtype() == mime::STAR {
        return Some(1);
    }
    // the suffix is part of the subtype: `+xml` never stands in for `+json`
    (range.subtype() == media_type.subtype() && range.suffix() == media_type.suffix()).then_some(2)
}

fn quality(range: &Mime) -> f32 {
    range
        .get_param("q")
        .and_then(|q| q.as_str().parse::<f32>().ok())
        .unwrap_or(1.0)
}
