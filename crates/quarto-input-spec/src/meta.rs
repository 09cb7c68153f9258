//! Positions within a configuration value.
//!
//! A [`Meta`] locates the value currently being normalised: an optional
//! source label (usually the file the configuration came from) plus the
//! path of keys and indexes from the root. Specs never build a root `Meta`
//! themselves; they derive child positions with [`Meta::at`] and
//! [`Meta::indexed_at`] from the position they were handed, and embed the
//! active position in every error they raise.
//!
//! Hosts that track more than keys and indexes (line numbers, source spans)
//! implement [`Position`] and attach it with [`Meta::with_position`]. The
//! host position is derived alongside the path on every `at` and
//! `indexed_at`, so it reaches every error without specs knowing about it.

use std::fmt;
use std::sync::Arc;

/// Host-supplied position carried alongside the key path.
pub trait Position: fmt::Debug + fmt::Display + Send + Sync {
    /// The host position of dictionary key `key` below this one.
    fn at(&self, key: &str) -> Arc<dyn Position>;

    /// The host position of list index `index` below this one.
    fn indexed_at(&self, index: usize) -> Arc<dyn Position>;
}

/// Position of a value within a nested configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    source: Option<String>,
    path: Vec<PathSegment>,
    position: Option<Arc<dyn Position>>,
}

/// A segment in a position path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Dictionary key
    Key(String),
    /// List index
    Index(usize),
}

impl Meta {
    /// A root position with no source label.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A root position for configuration read from `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Attach a host position; children derive theirs from it.
    pub fn with_position(mut self, position: impl Position + 'static) -> Self {
        self.position = Some(Arc::new(position));
        self
    }

    /// The position of dictionary key `key` below this one.
    pub fn at(&self, key: impl Into<String>) -> Meta {
        self.child(PathSegment::Key(key.into()))
    }

    /// The position of list index `index` below this one.
    pub fn indexed_at(&self, index: usize) -> Meta {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Meta {
        let position = self.position.as_ref().map(|position| match &segment {
            PathSegment::Key(key) => position.at(key),
            PathSegment::Index(index) => position.indexed_at(*index),
        });
        let mut path = self.path.clone();
        path.push(segment);
        Meta {
            source: self.source.clone(),
            path,
            position,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn position(&self) -> Option<&dyn Position> {
        self.position.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// The path rendered as `format.html[0]`, or `(root)`.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "(root)".to_string();
        }
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{}]", index));
                }
            }
        }
        out
    }
}

// Host positions have no identity of their own; they compare by rendering.
impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.path == other.path
            && self.position.as_ref().map(ToString::to_string)
                == other.position.as_ref().map(ToString::to_string)
    }
}

impl Eq for Meta {}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} at {}", source, self.path_string())?,
            None => write!(f, "{}", self.path_string())?,
        }
        if let Some(position) = &self.position {
            write!(f, " ({})", position)?;
        }
        Ok(())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}
