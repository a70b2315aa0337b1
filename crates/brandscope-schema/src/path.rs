//! Field paths for addressing within records
//!
//! Provides [`FieldPath`] for pointing at a field, or a list element, inside a
//! JSON record. Used by violations, templates and merge guards.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Named object field
    Key(String),
    /// Position within a list
    Index(usize),
}

impl Segment {
    /// Field name, if this is a key segment
    #[inline]
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }
}

/// Path within a record
///
/// # Examples
/// - `["topLevelMetrics", "marketSize"]` → `topLevelMetrics.marketSize`
/// - `["competition", 2, "rating"]` → `competition[2].rating`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// Empty path (the record itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path to a single top-level field
    #[inline]
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![Segment::Key(key.into())])
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a field name, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(Segment::Key(key.into()));
        new
    }

    /// Append a list position, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(Segment::Index(index));
        new
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Look up the value this path points at
    #[must_use]
    pub fn lookup<'v>(&self, value: &'v serde_json::Value) -> Option<&'v serde_json::Value> {
        self.0.iter().try_fold(value, |current, segment| match segment {
            Segment::Key(key) => current.get(key.as_str()),
            Segment::Index(index) => current.get(*index),
        })
    }

    /// Mutable slot for the value this path points at
    ///
    /// Missing object keys along the way are created, and a `null` stepped
    /// into by key becomes an empty object. List positions must already
    /// exist. When the path cannot be resolved, `value` is left unchanged.
    pub fn lookup_mut<'v>(
        &self,
        value: &'v mut serde_json::Value,
    ) -> Option<&'v mut serde_json::Value> {
        if !self.is_reachable(value) {
            return None;
        }
        self.0
            .iter()
            .try_fold(value, |current, segment| match segment {
                Segment::Key(key) => {
                    if current.is_null() {
                        *current = serde_json::Value::Object(serde_json::Map::new());
                    }
                    current
                        .as_object_mut()
                        .map(|map| map.entry(key.clone()).or_insert(serde_json::Value::Null))
                }
                Segment::Index(index) => current.get_mut(*index),
            })
    }

    /// Whether `lookup_mut` would resolve against `value`
    ///
    /// Once a key is missing, everything after it is created, so only keys
    /// may follow.
    fn is_reachable(&self, value: &serde_json::Value) -> bool {
        let mut current = value;
        for (i, segment) in self.0.iter().enumerate() {
            current = match (current, segment) {
                (serde_json::Value::Object(map), Segment::Key(key)) => match map.get(key) {
                    Some(next) => next,
                    None => return self.only_keys_after(i),
                },
                (serde_json::Value::Null, Segment::Key(_)) => return self.only_keys_after(i),
                (serde_json::Value::Array(items), Segment::Index(index)) => match items.get(*index) {
                    Some(next) => next,
                    None => return false,
                },
                _ => return false,
            };
        }
        true
    }

    fn only_keys_after(&self, position: usize) -> bool {
        self.0[position + 1..].iter().all(|s| s.as_key().is_some())
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut after_index = false;
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if !after_index {
                        return Err(PathError::EmptySegment);
                    }
                    if chars.peek().is_none() {
                        return Err(PathError::EmptySegment);
                    }
                    after_index = false;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if !after_index {
                        return Err(PathError::EmptySegment);
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => return Err(PathError::UnclosedIndex(s.to_string())),
                        }
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| PathError::InvalidIndex(digits))?;
                    segments.push(Segment::Index(index));
                    after_index = true;
                }
                c if c.is_alphanumeric() || c == '_' => {
                    // `a[0]b` has no separator after the index
                    if after_index {
                        return Err(PathError::InvalidSegment(s.to_string()));
                    }
                    key.push(c);
                }
                other => return Err(PathError::InvalidCharacter(other)),
            }
        }

        if !key.is_empty() {
            segments.push(Segment::Key(key));
        }
        Ok(Self(segments))
    }
}

impl From<Vec<Segment>> for FieldPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

/// Errors related to field paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment that cannot be split into keys and indices
    #[error("invalid segment in '{0}'")]
    InvalidSegment(String),

    /// Character outside `[A-Za-z0-9_]`
    #[error("invalid character '{0}' (must be alphanumeric or underscore)")]
    InvalidCharacter(char),

    /// List index that is not a non-negative integer
    #[error("invalid list index '{0}'")]
    InvalidIndex(String),

    /// `[` without matching `]`
    #[error("unclosed list index in '{0}'")]
    UnclosedIndex(String),
}
