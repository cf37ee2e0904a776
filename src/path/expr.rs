//! Path expressions and the normalization of caller input into them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text of the wildcard segment in interpreted mode.
pub const WILDCARD: &str = "*";

/// Default separator used when splitting string paths.
pub const DEFAULT_SEPARATOR: &str = "/";

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Map key, or sequence index written as a decimal string
    Key(String),
    /// Every key/index present at this level
    Wildcard,
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Key(key) => key,
            Segment::Wildcard => WILDCARD,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How string input is turned into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Split at the separator, recognize `*`, unpack groups
    #[default]
    Interpreted,
    /// Every part is one literal key
    Literal,
}

/// One piece of caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Key(String),
    Index(i64),
    /// Several keys supplied as one unit: unpacked when interpreted, a single
    /// key when literal.
    Group(Vec<String>),
    /// An already canonical segment, never split or reinterpreted
    Segment(Segment),
}

impl Part {
    pub fn group<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Part::Group(keys.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Part {
    fn from(key: &str) -> Self {
        Part::Key(key.to_string())
    }
}

impl From<String> for Part {
    fn from(key: String) -> Self {
        Part::Key(key)
    }
}

impl From<i64> for Part {
    fn from(index: i64) -> Self {
        Part::Index(index)
    }
}

impl From<i32> for Part {
    fn from(index: i32) -> Self {
        Part::Index(i64::from(index))
    }
}

impl From<usize> for Part {
    /// Indices past `i64::MAX` keep their exact text as a key.
    fn from(index: usize) -> Self {
        match i64::try_from(index) {
            Ok(index) => Part::Index(index),
            Err(_) => Part::Key(index.to_string()),
        }
    }
}

impl From<Segment> for Part {
    fn from(segment: Segment) -> Self {
        Part::Segment(segment)
    }
}

/// Heterogeneous path input: a string, a scalar key, or a list of parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathInput {
    parts: Vec<Part>,
}

impl PathInput {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

macro_rules! path_input_from_part {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathInput {
                fn from(part: $ty) -> Self {
                    Self {
                        parts: vec![Part::from(part)],
                    }
                }
            }
        )*
    };
}

path_input_from_part!(&str, String, i64, i32, usize, Segment, Part);

impl<T: Into<Part>> From<Vec<T>> for PathInput {
    fn from(parts: Vec<T>) -> Self {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Into<Part>, const N: usize> From<[T; N]> for PathInput {
    fn from(parts: [T; N]) -> Self {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Into<Part> + Clone> From<&[T]> for PathInput {
    fn from(parts: &[T]) -> Self {
        Self {
            parts: parts.iter().cloned().map(Into::into).collect(),
        }
    }
}

impl From<&PathExpr> for PathInput {
    fn from(path: &PathExpr) -> Self {
        Self {
            parts: path.segments.iter().cloned().map(Part::Segment).collect(),
        }
    }
}

impl From<PathExpr> for PathInput {
    fn from(path: PathExpr) -> Self {
        Self {
            parts: path.segments.into_iter().map(Part::Segment).collect(),
        }
    }
}

/// A canonical, immutable path.
///
/// Identity is the segment list alone; the separator and mode only matter when
/// new input is parsed relative to this path.
#[derive(Debug, Clone)]
pub struct PathExpr {
    segments: Vec<Segment>,
    separator: String,
    mode: PathMode,
}

impl PartialEq for PathExpr {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for PathExpr {}

impl Default for PathExpr {
    fn default() -> Self {
        Self::root(DEFAULT_SEPARATOR, PathMode::Interpreted)
    }
}

impl PathExpr {
    /// The empty path with the given parsing settings.
    pub fn root(separator: impl Into<String>, mode: PathMode) -> Self {
        Self {
            segments: Vec::new(),
            separator: separator.into(),
            mode,
        }
    }

    /// Normalizes caller input into a path.
    ///
    /// # Example
    ///
    /// ```
    /// use pathdict::path::{PathExpr, PathMode, Segment};
    ///
    /// let path = PathExpr::parse("users//*/age", "/", PathMode::Interpreted);
    /// assert_eq!(
    ///     path.segments(),
    ///     &[Segment::key("users"), Segment::Wildcard, Segment::key("age")]
    /// );
    ///
    /// let raw = PathExpr::parse("users/*", "/", PathMode::Literal);
    /// assert_eq!(raw.segments(), &[Segment::key("users/*")]);
    /// ```
    pub fn parse(input: impl Into<PathInput>, separator: &str, mode: PathMode) -> Self {
        let input = input.into();
        let mut segments = Vec::new();

        for part in input.parts {
            match part {
                Part::Key(key) => push_key(&mut segments, key, separator, mode),
                Part::Index(index) => segments.push(Segment::Key(index.to_string())),
                Part::Group(keys) => match mode {
                    PathMode::Interpreted => {
                        for key in keys {
                            push_key(&mut segments, key, separator, mode);
                        }
                    }
                    PathMode::Literal => push_key(&mut segments, keys.join(separator), separator, mode),
                },
                Part::Segment(segment) => segments.push(segment),
            }
        }

        Self {
            segments,
            separator: separator.to_string(),
            mode,
        }
    }

    /// Builds a path from canonical segments, kept exactly as given.
    pub fn from_segments(segments: Vec<Segment>, separator: &str, mode: PathMode) -> Self {
        Self {
            segments,
            separator: separator.to_string(),
            mode,
        }
    }

    /// Returns a new path with these segments and this path's settings.
    pub fn with_segments(&self, segments: Vec<Segment>) -> Self {
        Self::from_segments(segments, &self.separator, self.mode)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn mode(&self) -> PathMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_wildcards(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The path without its last segment. The parent of the root is the root.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        self.with_segments(segments)
    }

    /// The path extended by one segment.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        self.with_segments(segments)
    }

    /// Segment texts, e.g. for reporting gathered paths.
    pub fn keys(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a PathExpr {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.segments.iter().map(Segment::as_str).collect();
        f.write_str(&joined.join(&self.separator))
    }
}

/// Adds caller-supplied text as segments. Empty pieces are dropped here, never
/// in segments that came from a tree.
fn push_key(segments: &mut Vec<Segment>, key: String, separator: &str, mode: PathMode) {
    match mode {
        PathMode::Literal => {
            if !key.is_empty() {
                segments.push(Segment::Key(key));
            }
        }
        PathMode::Interpreted => {
            if separator.is_empty() || !key.contains(separator) {
                if !key.is_empty() {
                    segments.push(interpret(key));
                }
            } else {
                segments.extend(
                    key.split(separator)
                        .filter(|piece| !piece.is_empty())
                        .map(|piece| interpret(piece.to_string())),
                );
            }
        }
    }
}

fn interpret(key: String) -> Segment {
    if key == WILDCARD {
        Segment::Wildcard
    } else {
        Segment::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(path: &PathExpr) -> Vec<&str> {
        path.iter().map(Segment::as_str).collect()
    }

    #[test]
    fn test_parse_string_splits_on_separator() {
        let path = PathExpr::parse("a/b/c", "/", PathMode::Interpreted);
        assert_eq!(keys(&path), vec!["a", "b", "c"]);
        assert!(!path.has_wildcards());
    }

    #[test]
    fn test_parse_discards_empty_segments() {
        let path = PathExpr::parse("/a//b/", "/", PathMode::Interpreted);
        assert_eq!(keys(&path), vec!["a", "b"]);
        assert!(PathExpr::parse("", "/", PathMode::Interpreted).is_empty());
    }

    #[test]
    fn test_parse_list_input() {
        let path = PathExpr::parse(vec!["users", "1/name"], "/", PathMode::Interpreted);
        assert_eq!(keys(&path), vec!["users", "1", "name"]);
    }

    #[test]
    fn test_parse_scalar_index() {
        let path = PathExpr::parse(2, "/", PathMode::Interpreted);
        assert_eq!(keys(&path), vec!["2"]);
    }

    #[test]
    fn test_unsigned_index_is_an_index() {
        assert_eq!(Part::from(3usize), Part::Index(3));
        let path = PathExpr::parse(vec![Part::from("l"), Part::from(0usize)], "/", PathMode::Literal);
        assert_eq!(keys(&path), vec!["l", "0"]);
    }

    #[test]
    fn test_parse_custom_separator() {
        let path = PathExpr::parse("a.b/c.*", ".", PathMode::Interpreted);
        assert_eq!(
            path.segments(),
            &[Segment::key("a"), Segment::key("b/c"), Segment::Wildcard]
        );
    }

    #[test]
    fn test_literal_mode_keeps_wildcard_and_separator() {
        let path = PathExpr::parse(vec!["*", "a/b"], "/", PathMode::Literal);
        assert_eq!(path.segments(), &[Segment::key("*"), Segment::key("a/b")]);
        assert!(!path.has_wildcards());
    }

    #[test]
    fn test_group_unpacked_unless_literal() {
        let input = PathInput::new(vec![Part::from("x"), Part::group(["a", "b"])]);
        let interpreted = PathExpr::parse(input.clone(), "/", PathMode::Interpreted);
        assert_eq!(keys(&interpreted), vec!["x", "a", "b"]);

        let literal = PathExpr::parse(input, "/", PathMode::Literal);
        assert_eq!(keys(&literal), vec!["x", "a/b"]);
    }

    #[test]
    fn test_segments_from_path_are_not_resplit() {
        let original = PathExpr::parse(vec!["a/b"], "/", PathMode::Literal);
        let reparsed = PathExpr::parse(&original, "/", PathMode::Interpreted);
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_canonical_empty_keys_are_kept() {
        let path = PathExpr::from_segments(
            vec![Segment::key("m"), Segment::key("")],
            "/",
            PathMode::Interpreted,
        );
        assert_eq!(keys(&path), vec!["m", ""]);
        assert_eq!(keys(&PathExpr::parse(&path, "/", PathMode::Interpreted)), vec!["m", ""]);
        assert_eq!(keys(&path.child(Segment::key(""))), vec!["m", "", ""]);

        let literal = PathExpr::parse(vec!["", "a"], "/", PathMode::Literal);
        assert_eq!(keys(&literal), vec!["a"]);
    }

    #[test]
    fn test_equality_ignores_settings() {
        let a = PathExpr::parse("a/b", "/", PathMode::Interpreted);
        let b = PathExpr::parse(vec!["a", "b"], ":", PathMode::Literal);
        assert_eq!(a, b);
        assert_ne!(a.separator(), b.separator());
    }

    #[test]
    fn test_parent_and_child_keep_settings() {
        let path = PathExpr::parse("a.b", ".", PathMode::Interpreted);
        let parent = path.parent();
        assert_eq!(keys(&parent), vec!["a"]);
        assert_eq!(parent.separator(), ".");

        let children = parent.child(Segment::Wildcard);
        assert!(children.has_wildcards());
        assert_eq!(children.to_string(), "a.*");
        assert!(PathExpr::default().parent().is_empty());
    }
}
