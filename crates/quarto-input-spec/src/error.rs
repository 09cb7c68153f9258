// Error types for spec normalisation

use crate::meta::Meta;
use crate::value::{Value, ValueType};
use std::fmt;
use thiserror::Error;

/// Result type for normalisation operations
pub type SpecResult<T> = Result<T, SpecError>;

/// Category of a normalisation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecErrorKind {
    /// No branch of a spec could handle a supplied value.
    ///
    /// This is a mistake in how the spec tree was built, not in the input.
    BadSpec,
    /// A supplied value failed a constraint.
    ///
    /// Composite specs also use this kind for aggregated failures, in which
    /// case `errors` holds the child failures.
    BadSpecValue,
    /// A value that should name an existing directory doesn't.
    BadDirectory,
    /// A value that should name an existing file doesn't.
    BadFilename,
}

impl SpecErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            SpecErrorKind::BadSpec => "BadSpec",
            SpecErrorKind::BadSpecValue => "BadSpecValue",
            SpecErrorKind::BadDirectory => "BadDirectory",
            SpecErrorKind::BadFilename => "BadFilename",
        }
    }
}

impl fmt::Display for SpecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What was received instead of what was expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Got {
    /// Only the type of the offending value is reported
    Type(ValueType),
    /// The offending value itself
    Value(Value),
}

impl fmt::Display for Got {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Got::Type(value_type) => write!(f, "{}", value_type),
            Got::Value(value) => write!(f, "{}", value),
        }
    }
}

/// A normalisation failure, possibly aggregating further failures.
///
/// Only `kind` and `meta` are always meaningful; every other field is
/// context that a particular spec chose to attach.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct SpecError {
    pub kind: SpecErrorKind,
    pub message: Option<String>,
    /// Position that was active when the error was raised
    pub meta: Meta,
    pub expected: Option<String>,
    pub available: Option<Vec<Value>>,
    pub got: Option<Got>,
    pub val: Option<Value>,
    /// The offending directory or filename for path errors
    pub path: Option<String>,
    /// Child failures (never flattened across levels)
    pub errors: Vec<SpecError>,
}

impl SpecError {
    pub fn new(kind: SpecErrorKind, meta: Meta) -> Self {
        Self {
            kind,
            message: None,
            meta,
            expected: None,
            available: None,
            got: None,
            val: None,
            path: None,
            errors: Vec::new(),
        }
    }

    /// The spec has no branch for a supplied value.
    pub fn bad_spec(meta: Meta, val: Value) -> Self {
        Self::new(SpecErrorKind::BadSpec, meta)
            .with_message("Spec doesn't know how to deal with this value")
            .with_val(val)
    }

    pub fn bad_spec_value(meta: Meta, message: impl Into<String>) -> Self {
        Self::new(SpecErrorKind::BadSpecValue, meta).with_message(message)
    }

    pub fn bad_directory(meta: Meta, message: impl Into<String>) -> Self {
        Self::new(SpecErrorKind::BadDirectory, meta).with_message(message)
    }

    pub fn bad_filename(meta: Meta, message: impl Into<String>) -> Self {
        Self::new(SpecErrorKind::BadFilename, meta).with_message(message)
    }

    /// Wrap the failures of several independent children into one error.
    pub fn aggregate(meta: Meta, errors: Vec<SpecError>) -> Self {
        Self::new(SpecErrorKind::BadSpecValue, meta).with_errors(errors)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_available(mut self, available: Vec<Value>) -> Self {
        self.available = Some(available);
        self
    }

    pub fn with_got(mut self, got: Got) -> Self {
        self.got = Some(got);
        self
    }

    /// Report the type of `value` as what was received.
    pub fn with_got_type(self, value: &Value) -> Self {
        self.with_got(Got::Type(value.value_type()))
    }

    /// Report `value` itself as what was received.
    pub fn with_got_value(self, value: Value) -> Self {
        self.with_got(Got::Value(value))
    }

    pub fn with_val(mut self, val: Value) -> Self {
        self.val = Some(val);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<SpecError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_aggregate(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every failure without children, depth-first in reporting order.
    pub fn leaves(&self) -> Vec<&SpecError> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a SpecError>) {
        if self.errors.is_empty() {
            out.push(self);
        }
        for child in &self.errors {
            child.collect_leaves(out);
        }
    }

    /// Render this error and every nested error as an indented tree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.headline());
        out.push('\n');
        for child in &self.errors {
            child.render_into(out, depth + 1);
        }
    }

    fn headline(&self) -> String {
        let mut line = format!("{} at {}", self.kind, self.meta);
        if let Some(message) = &self.message {
            line.push_str(": ");
            line.push_str(message);
        }

        let mut details = Vec::new();
        if let Some(expected) = &self.expected {
            details.push(format!("expected={}", expected));
        }
        if let Some(available) = &self.available {
            let items: Vec<String> = available.iter().map(|v| v.to_string()).collect();
            details.push(format!("available=[{}]", items.join(", ")));
        }
        if let Some(got) = &self.got {
            details.push(format!("got={}", got));
        }
        if let Some(val) = &self.val {
            details.push(format!("val={}", val));
        }
        if let Some(path) = &self.path {
            let label = match self.kind {
                SpecErrorKind::BadFilename => "filename",
                _ => "directory",
            };
            details.push(format!("{}={:?}", label, path));
        }
        if !details.is_empty() {
            line.push_str(&format!(" ({})", details.join(", ")));
        }
        line
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())?;
        match self.errors.len() {
            0 => Ok(()),
            1 => write!(f, " [1 nested error]"),
            n => write!(f, " [{} nested errors]", n),
        }
    }
}
