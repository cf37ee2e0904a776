//! Wildcard expansion against a concrete tree.

use super::error::Result;
use super::expr::{PathExpr, Segment};
use super::navigate::{keys_or_indices, resolve};
use crate::document::node::Value;
use tracing::debug;

/// Expands every wildcard in `path` into the keys present in `root`.
///
/// Candidates are processed left to right; at each wildcard every surviving
/// prefix is replaced by one prefix per key (or index) found under it, in
/// document order. Prefixes that run into a missing map key are dropped.
/// Enumerating a leaf is a structural error.
///
/// A path without wildcards expands to itself. No matches is an empty list.
///
/// # Example
///
/// ```
/// use pathdict::document::node::Value;
/// use pathdict::path::{expand, PathExpr, PathMode};
///
/// let tree = Value::from(serde_json::json!({"a": {"x": 1}, "b": {"x": 2}}));
/// let path = PathExpr::parse("*/x", "/", PathMode::Interpreted);
/// let paths: Vec<String> = expand(&path, &tree)
///     .unwrap()
///     .iter()
///     .map(|p| p.to_string())
///     .collect();
/// assert_eq!(paths, vec!["a/x", "b/x"]);
/// ```
pub fn expand(path: &PathExpr, root: &Value) -> Result<Vec<PathExpr>> {
    if !path.has_wildcards() {
        return Ok(vec![path.clone()]);
    }

    let mut candidates: Vec<Vec<Segment>> = vec![Vec::new()];

    for segment in path {
        match segment {
            Segment::Key(_) => {
                for prefix in &mut candidates {
                    prefix.push(segment.clone());
                }
            }
            Segment::Wildcard => {
                let mut next = Vec::new();
                for prefix in &candidates {
                    let Some(node) = resolve(root, prefix)? else {
                        continue;
                    };
                    let at = prefix.last().map(Segment::as_str).unwrap_or_default();
                    for key in keys_or_indices(node, at)? {
                        let mut expanded = prefix.clone();
                        expanded.push(Segment::Key(key));
                        next.push(expanded);
                    }
                }
                candidates = next;
            }
        }
    }

    debug!(path = %path, matches = candidates.len(), "expanded wildcard path");

    Ok(candidates
        .into_iter()
        .map(|segments| path.with_segments(segments))
        .collect())
}
