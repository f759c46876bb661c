//! Key paths into a document value tree
//!
//! A key path addresses a leaf or subtree using a sequence of key and
//! index segments.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Object key (first segment only) | `user` |
//! | `.key` | Object key | `.name` |
//! | `[n]` | Array index | `[0]` |
//! | `$.` | Optional root prefix | `$.user.name` |
//! | `\.` `\[` `\]` `\\` | Literal special character in a key | `a\.b` |
//!
//! A parsed path always starts with a key: a root-level array is never
//! addressable. Paths built programmatically (for example the mismatch
//! locations reported by the comparator) may start with an index.

use crate::error::{Error, KeyPathError};
use crate::limits::Limits;
use std::fmt;
use std::str::FromStr;

/// A segment in a key path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key: `.foo`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

impl PathSegment {
    /// Check if this segment addresses an object key
    pub fn is_key(&self) -> bool {
        matches!(self, PathSegment::Key(_))
    }

    /// Check if this segment addresses an array index
    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }

    /// Container kind this segment requires its parent to be
    pub fn container_name(&self) -> &'static str {
        match self {
            PathSegment::Key(_) => "object",
            PathSegment::Index(_) => "array",
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", escape_key(k)),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A path into a document value tree
///
/// # Examples
///
/// ```
/// use replikit_core::path::{KeyPath, PathSegment};
///
/// let path: KeyPath = "$.user.scores[1]".parse().unwrap();
/// assert_eq!(
///     path.segments(),
///     &[
///         PathSegment::Key("user".to_string()),
///         PathSegment::Key("scores".to_string()),
///         PathSegment::Index(1),
///     ]
/// );
/// assert_eq!(path.to_string(), "user.scores[1]");
///
/// let escaped: KeyPath = r"a\.b".parse().unwrap();
/// assert_eq!(escaped.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Create the empty path
    ///
    /// The empty path is never produced by parsing; it only locates a
    /// comparison mismatch at the root of a tree.
    pub fn root() -> Self {
        KeyPath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        KeyPath { segments }
    }

    /// Parse a path, then check it against the given limits
    pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<Self, Error> {
        let path: KeyPath = text.parse()?;
        limits.validate_path_length(path.len())?;
        Ok(path)
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the empty path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Push a segment (mutating)
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Get the last segment (None if empty)
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Split into the segments leading to the parent and the final segment
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_last()
    }

    /// Get the parent path (None if empty)
    pub fn parent(&self) -> Option<KeyPath> {
        self.split_last()
            .map(|(_, parent)| KeyPath::from_segments(parent.to_vec()))
    }

    /// Render the first `count` segments, used to locate navigation errors
    pub fn prefix_string(&self, count: usize) -> String {
        KeyPath::from_segments(self.segments[..count.min(self.len())].to_vec()).to_string()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Key(k) if i == 0 => write!(f, "{}", escape_key(k))?,
                _ => write!(f, "{}", seg)?,
            }
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = KeyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPathParser::new(s).parse()
    }
}

/// Escape the characters that are special inside a key
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if matches!(c, '.' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Single-use parser over the characters of a path
struct KeyPathParser<'a> {
    text: &'a str,
    chars: Vec<char>,
}

impl<'a> KeyPathParser<'a> {
    fn new(text: &'a str) -> Self {
        KeyPathParser {
            text,
            chars: text.chars().collect(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> KeyPathError {
        KeyPathError::new(self.text, reason)
    }

    fn parse(&self) -> Result<KeyPath, KeyPathError> {
        if self.chars.is_empty() {
            return Err(self.error("Empty key path"));
        }

        let mut segments = Vec::new();
        let mut i = 0;

        if self.chars[0] == '$' {
            if self.chars.get(1) != Some(&'.') {
                return Err(self.error("Prefix '$' is not followed by '.'"));
            }
            i = 1;
        }

        while i < self.chars.len() {
            let c = self.chars[i];
            if c == '.' || i == 0 {
                let start = if c == '.' { i + 1 } else { i };
                let (key, end) = self.parse_key(start)?;
                segments.push(PathSegment::Key(key));
                i = end;
            } else if c == '[' {
                let (index, end) = self.parse_index(i + 1)?;
                segments.push(PathSegment::Index(index));
                i = end;
            } else {
                return Err(self.error(format!("Illegal character found at index {}", i)));
            }
        }

        Ok(KeyPath { segments })
    }

    /// Parse a key starting at `start`; returns the key and the position of
    /// the first character after it
    fn parse_key(&self, start: usize) -> Result<(String, usize), KeyPathError> {
        let mut key = String::new();
        let mut i = start;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => {
                    let escaped = self
                        .chars
                        .get(i + 1)
                        .ok_or_else(|| self.error("Unescaped special character '\\' found"))?;
                    key.push(*escaped);
                    i += 2;
                }
                ']' => return Err(self.error("Unescaped special character ']' found")),
                '.' | '[' => break,
                c => {
                    key.push(c);
                    i += 1;
                }
            }
        }
        if key.is_empty() {
            return Err(self.error("Empty key found"));
        }
        Ok((key, i))
    }

    /// Parse an index whose digits start at `start`; returns the index and
    /// the position after the closing bracket
    fn parse_index(&self, start: usize) -> Result<(usize, usize), KeyPathError> {
        let mut digits = String::new();
        for i in start..self.chars.len() {
            match self.chars[i] {
                c if c.is_ascii_digit() => digits.push(c),
                ']' => {
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| self.error("Invalid array index found"))?;
                    return Ok((index, i + 1));
                }
                _ => return Err(self.error("Invalid array index found")),
            }
        }
        Err(self.error("Close bracket for an array index not found"))
    }
}
