//! Dotted field-path resolution.

use bson::Bson;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Collapse single-element array results (used by query predicates).
    pub unwrap_array: bool,
}

/// Resolves `path` against `document`.
///
/// Numeric segments index into arrays. Any other segment that meets an array is applied to
/// each element, and the defined results are collected into a new array. Scalars and the
/// empty path resolve to `None`.
#[must_use]
pub fn resolve(document: &Bson, path: &str, options: ResolveOptions) -> Option<Bson> {
    if path.is_empty() || !matches!(document, Bson::Document(_) | Bson::Array(_)) {
        return None;
    }
    let segments: Vec<&str> = path.split('.').collect();
    let mut fanout = 0usize;
    let value = walk(document, &segments, &mut fanout, false)?;
    if options.unwrap_array {
        Some(unwrap(value, fanout.max(1)))
    } else {
        Some(value)
    }
}

fn walk(value: &Bson, segments: &[&str], fanout: &mut usize, nested: bool) -> Option<Bson> {
    let mut current = value;
    for (i, seg) in segments.iter().enumerate() {
        if let Bson::Array(items) = current {
            if !is_index(seg) {
                // an array directly inside a fanned-out array is returned as is
                if i == 0 && nested {
                    return Some(current.clone());
                }
                *fanout += 1;
                let rest = &segments[i..];
                let collected =
                    items.iter().filter_map(|item| walk(item, rest, fanout, true)).collect();
                return Some(Bson::Array(collected));
            }
        }
        current = step(current, seg)?;
    }
    Some(current.clone())
}

fn step<'a>(value: &'a Bson, seg: &str) -> Option<&'a Bson> {
    match value {
        Bson::Document(d) => d.get(seg),
        Bson::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn is_index(seg: &str) -> bool {
    !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit())
}

fn unwrap(mut value: Bson, mut levels: usize) -> Bson {
    while levels > 0 {
        match value {
            Bson::Array(mut items) if items.len() == 1 => {
                value = items.pop().unwrap_or(Bson::Null);
            }
            other => return other,
        }
        levels -= 1;
    }
    value
}
