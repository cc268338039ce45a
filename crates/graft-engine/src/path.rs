//! Namespace path parsing
//!
//! A namespace path is an ordered sequence of identifier segments
//! (`Geometry::Shapes::Point`). Every proper prefix of a path must be
//! resolvable before the next segment is created under it; the registry
//! enforces that invariant, this module only represents and parses paths.

use crate::error::RegisterError;
use std::fmt;

/// Separator between path segments in the textual form
pub const SEPARATOR: &str = "::";

/// An ordered sequence of namespace identifier segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// Parse a path from its `A::B::C` textual form.
    ///
    /// Segments must be non-empty and consist of alphanumerics and
    /// underscores, starting with a letter or underscore.
    pub fn parse(path: &str) -> Result<Self, RegisterError> {
        if path.is_empty() {
            return Err(RegisterError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }
        let segments: Vec<String> = path.split(SEPARATOR).map(str::to_string).collect();
        for segment in &segments {
            if !Self::valid_segment(segment) {
                return Err(RegisterError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("invalid segment `{}`", segment),
                });
            }
        }
        Ok(NamespacePath { segments })
    }

    fn valid_segment(segment: &str) -> bool {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_alphanumeric() || c == '_')
    }

    /// The path's segments in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the path has no segments (cannot occur for parsed paths)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment
    pub fn leaf(&self) -> &str {
        // parse() rejects empty paths, so there is always a last segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Textual form of the prefix ending at segment index `end` (inclusive)
    pub fn prefix(&self, end: usize) -> String {
        self.segments[..=end].join(SEPARATOR)
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(SEPARATOR))
    }
}
