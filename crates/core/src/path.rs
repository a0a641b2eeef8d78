//! Path expressions addressing nested fields of a document
//!
//! A [`DocPath`] is a sequence of [`PathSegment`]s parsed from a
//! dot-delimited string. Bracketed indices are accepted as well.
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Map key (or array index when the target is an array) | `user` |
//! | `a.b` | Nested keys | `user.name` |
//! | `a.0` | Numeric segment | `items.0` |
//! | `a[n]` | Explicit index | `items[0]` |
//! | (empty) | Whole document | `` |
//!
//! Resolution is driven by the container found at each step, so `items.0`
//! and `items[0]` address the same element of an array, and `[0]` on a map
//! looks up the key `"0"`.

use crate::value::{Value, ValueMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of `Null` slots a single write may pad onto an array
pub const MAX_INDEX_GAP: usize = 1024;

/// Errors from parsing or applying a path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Empty segment (`a..b`, trailing dot)
    #[error("empty segment in path at position {0}")]
    EmptySegment(usize),

    /// Bracket opened but never closed
    #[error("unterminated bracket starting at position {0}")]
    UnterminatedBracket(usize),

    /// Bracket contents are not a non-negative integer
    #[error("invalid array index: {0}")]
    InvalidIndex(String),

    /// Character not allowed at this position
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    /// A non-numeric segment addressed an array during a write
    #[error("segment '{segment}' cannot index an array")]
    NotAnIndex {
        /// The offending segment
        segment: String,
    },

    /// A write index lies more than [`MAX_INDEX_GAP`] past the end of an array
    #[error("index {0} is too far past the end of the array")]
    IndexOutOfRange(usize),
}

/// A single step in a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Dotted segment: `.foo` or `.0`
    Key(String),
    /// Bracketed segment: `[0]`
    Index(usize),
}

impl PathSegment {
    /// The array index this segment denotes, if any
    ///
    /// Dotted segments count as indices when they are made only of ASCII
    /// digits.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) if !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()) => {
                k.parse().ok()
            }
            PathSegment::Key(_) => None,
        }
    }

    /// The map key this segment denotes
    pub fn to_key(&self) -> String {
        match self {
            PathSegment::Key(k) => k.clone(),
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A path into a document
///
/// ```
/// use strata_core::DocPath;
///
/// let path: DocPath = "user.tags[1]".parse().unwrap();
/// assert_eq!(path, DocPath::root().key("user").key("tags").index(1));
/// assert_eq!(path.to_string(), "user.tags[1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DocPath {
    segments: Vec<PathSegment>,
}

impl DocPath {
    /// The empty path, addressing the whole document
    pub fn root() -> Self {
        DocPath::default()
    }

    /// Build from segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        DocPath { segments }
    }

    /// The segments in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True for the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder style)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder style)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Concatenate `other` after this path
    pub fn join(&self, other: &DocPath) -> DocPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        DocPath { segments }
    }

    /// Render back to the textual form
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                PathSegment::Key(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                PathSegment::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
            }
        }
        result
    }
}

impl FromStr for DocPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(DocPath::root());
        }

        let mut segments = Vec::new();
        let mut chars = s.char_indices().peekable();

        loop {
            let start = chars.peek().map_or(s.len(), |&(pos, _)| pos);
            let mut key = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c == '.' || c == '[' || c == ']' {
                    break;
                }
                key.push(c);
                chars.next();
            }

            let mut indexed = false;
            while let Some(&(open, '[')) = chars.peek() {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some((_, ']')) => break,
                        Some((_, c)) => digits.push(c),
                        None => return Err(PathError::UnterminatedBracket(open)),
                    }
                }
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(PathError::InvalidIndex(digits));
                }
                let idx = digits
                    .parse::<usize>()
                    .map_err(|_| PathError::InvalidIndex(digits.clone()))?;
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
                segments.push(PathSegment::Index(idx));
                indexed = true;
            }

            if !key.is_empty() {
                segments.push(PathSegment::Key(key));
            } else if !indexed {
                return Err(PathError::EmptySegment(start));
            }

            match chars.next() {
                None => break,
                Some((_, '.')) => continue,
                Some((pos, c)) => return Err(PathError::UnexpectedChar(c, pos)),
            }
        }

        Ok(DocPath { segments })
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

// =============================================================================
// Nested access
// =============================================================================

fn child<'a>(value: &'a Value, seg: &PathSegment) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(&seg.to_key()),
        Value::Array(items) => seg.as_index().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, seg: &PathSegment) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(&seg.to_key()),
        Value::Array(items) => seg.as_index().and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

/// Slot for `seg` under `current`, created when missing
///
/// Scalars standing where a container is needed are replaced by an empty
/// map. Arrays are padded with `Null` up to the requested index, at most
/// [`MAX_INDEX_GAP`] slots past the current end.
fn slot<'a>(current: &'a mut Value, seg: &PathSegment) -> Result<&'a mut Value, PathError> {
    match current {
        Value::Array(items) => {
            let idx = seg.as_index().ok_or_else(|| PathError::NotAnIndex {
                segment: seg.to_string(),
            })?;
            if idx >= items.len() {
                if idx - items.len() > MAX_INDEX_GAP {
                    return Err(PathError::IndexOutOfRange(idx));
                }
                let len = idx.checked_add(1).ok_or(PathError::IndexOutOfRange(idx))?;
                items.resize(len, Value::Null);
            }
            Ok(&mut items[idx])
        }
        Value::Object(map) => Ok(map.entry(seg.to_key()).or_insert(Value::Null)),
        scalar => {
            *scalar = Value::Object(ValueMap::new());
            slot(scalar, seg)
        }
    }
}

/// Read the value at `path`
///
/// Returns `None` when any segment is missing.
pub fn get_at_path<'a>(root: &'a Value, path: &DocPath) -> Option<&'a Value> {
    let mut current = root;
    for seg in path.segments() {
        current = child(current, seg)?;
    }
    Some(current)
}

/// Mutable access to the value at `path`
pub fn get_at_path_mut<'a>(root: &'a mut Value, path: &DocPath) -> Option<&'a mut Value> {
    let mut current = root;
    for seg in path.segments() {
        current = child_mut(current, seg)?;
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate maps as needed
///
/// The root path replaces the whole document. Existing map keys keep
/// their position.
///
/// ```
/// use strata_core::{set_at_path, get_at_path, DocPath, Value};
///
/// let mut doc = Value::object();
/// let path: DocPath = "profile.name".parse().unwrap();
/// set_at_path(&mut doc, &path, Value::from("Ada")).unwrap();
/// assert_eq!(get_at_path(&doc, &path), Some(&Value::from("Ada")));
/// ```
pub fn set_at_path(root: &mut Value, path: &DocPath, value: Value) -> Result<(), PathError> {
    let mut current = root;
    for seg in path.segments() {
        current = slot(current, seg)?;
    }
    *current = value;
    Ok(())
}
