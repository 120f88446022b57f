//! Relationship paths for include traversal
//!
//! Provides [`RelationshipPath`], a dot-separated chain of relationship names.

use crate::error::PathError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Segment storage; include paths are rarely deeper than four relations.
type Segments = SmallVec<[String; 4]>;

/// Path through a resource graph's relationships
///
/// Always holds at least one segment and never an empty segment.
///
/// # Examples
/// - `["author"]` → `author`
/// - `["comments", "author", "posts"]` → `comments.author.posts`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationshipPath(Segments);

impl RelationshipPath {
    /// Create path from segments
    ///
    /// # Errors
    /// Returns error if there are no segments or any segment is invalid
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Segments = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() {
            return Err(PathError::EmptyPath);
        }

        for segment in &segments {
            validate_segment(segment, || segments.join("."))?;
        }

        Ok(Self(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments (the path depth)
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First relationship name
    #[inline]
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// Last relationship name
    #[inline]
    #[must_use]
    pub fn last(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// Leading `n` segments as a path
    ///
    /// Returns `None` for `n == 0`. Values of `n` beyond the path length
    /// return the whole path.
    #[must_use]
    pub fn take(&self, n: usize) -> Option<Self> {
        if n == 0 {
            return None;
        }
        Some(Self(self.0.iter().take(n).cloned().collect()))
    }

    /// Leading `n` segments joined with dots (empty string for `n == 0`)
    ///
    /// This is the traversal-position key used while encoding.
    #[must_use]
    pub fn take_string(&self, n: usize) -> String {
        let n = n.min(self.0.len());
        self.0[..n].join(".")
    }

    /// Path without its leading `n` segments
    ///
    /// Returns `None` when nothing remains.
    #[must_use]
    pub fn skip(&self, n: usize) -> Option<Self> {
        if n >= self.0.len() {
            return None;
        }
        Some(Self(self.0[n..].iter().cloned().collect()))
    }

    /// Append a segment, returning new path
    ///
    /// # Errors
    /// Returns error if the segment is empty or contains separators
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let segment = segment.into();
        validate_segment(&segment, || format!("{self}.{segment}"))?;
        let mut new = self.clone();
        new.0.push(segment);
        Ok(new)
    }

    /// Check if this path is a prefix of another (or equal to it)
    ///
    /// # Examples
    /// - `comments` is prefix of `comments.author`
    /// - `comments.author` is NOT prefix of `comments.post`
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0[..] == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn validate_segment(segment: &str, path: impl FnOnce() -> String) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment(path()));
    }
    if segment.contains(|c: char| c == '.' || c == ',' || c.is_whitespace()) {
        return Err(PathError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

impl Display for RelationshipPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for RelationshipPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let segments: Segments = s
            .split('.')
            .map(|seg| validate_segment(seg, || s.to_string()).map(|()| seg.to_string()))
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl TryFrom<&str> for RelationshipPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for RelationshipPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelationshipPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> RelationshipPath {
        s.parse().unwrap()
    }

    #[test]
    fn path_new_and_segments() {
        let path = RelationshipPath::new(["author", "posts"]).unwrap();
        assert_eq!(path.segments(), &["author", "posts"]);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn path_new_rejects_empty() {
        let result = RelationshipPath::new(Vec::<String>::new());
        assert!(matches!(result, Err(PathError::EmptyPath)));
    }

    #[test]
    fn path_new_rejects_empty_segment() {
        let result = RelationshipPath::new(["author", ""]);
        assert!(matches!(result, Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn path_first_and_last() {
        let path = path("comments.author.posts");
        assert_eq!(path.first(), "comments");
        assert_eq!(path.last(), "posts");
    }

    #[test]
    fn path_take() {
        let path = path("comments.author.posts");
        assert!(path.take(0).is_none());
        assert_eq!(path.take(1).unwrap().to_string(), "comments");
        assert_eq!(path.take(2).unwrap().to_string(), "comments.author");
        assert_eq!(path.take(10).unwrap(), path);
    }

    #[test]
    fn path_take_string() {
        let path = path("comments.author.posts");
        assert_eq!(path.take_string(0), "");
        assert_eq!(path.take_string(2), "comments.author");
        assert_eq!(path.take_string(3), "comments.author.posts");
    }

    #[test]
    fn path_skip() {
        let path = path("comments.author.posts");
        assert_eq!(path.skip(1).unwrap().to_string(), "author.posts");
        assert!(path.skip(3).is_none());
    }

    #[test]
    fn path_child() {
        let child = path("author").child("posts").unwrap();
        assert_eq!(child.to_string(), "author.posts");
        assert!(path("author").child("").is_err());
        assert!(path("author").child("a.b").is_err());
    }

    #[test]
    fn path_is_prefix_of() {
        let a = path("comments");
        let b = path("comments.author");
        let c = path("comments.post");
        assert!(a.is_prefix_of(&b));
        assert!(b.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(!b.is_prefix_of(&c));
    }

    #[test]
    fn path_from_str_trims() {
        assert_eq!(path("  author.posts ").to_string(), "author.posts");
    }

    #[test]
    fn path_from_str_empty() {
        let result: Result<RelationshipPath, _> = "".parse();
        assert!(matches!(result, Err(PathError::EmptyPath)));
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<RelationshipPath, _> = "author..posts".parse();
        assert!(matches!(result, Err(PathError::EmptySegment(_))));

        let result: Result<RelationshipPath, _> = "author.".parse();
        assert!(matches!(result, Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn path_from_str_rejects_inner_whitespace() {
        let result: Result<RelationshipPath, _> = "author. posts".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(_))));
    }

    #[test]
    fn path_from_str_rejects_comma() {
        let result: Result<RelationshipPath, _> = "a,b".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(seg)) if seg == "a,b"));

        let result: Result<RelationshipPath, _> = "author.posts,tags".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(seg)) if seg == "posts,tags"));

        assert!(crate::IncludePaths::from_strings(["author,tags"]).is_err());
    }

    #[test]
    fn path_ordering_is_lexicographic_by_segment() {
        let mut paths = vec![path("tags"), path("author.posts"), path("author")];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["author", "author.posts", "tags"]);
    }

    #[test]
    fn path_serde_as_string() {
        let path = path("author.posts");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"author.posts\"");

        let back: RelationshipPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);

        let bad: Result<RelationshipPath, _> = serde_json::from_str("\"a..b\"");
        assert!(bad.is_err());
    }
}
