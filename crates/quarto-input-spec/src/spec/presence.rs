//! Modifiers for how a spec treats an absent value.
//!
//! Each wraps another spec and delegates to it whenever a value was supplied.

use super::{BoxedSpec, Spec};
use crate::error::{SpecError, SpecResult};
use crate::meta::Meta;
use crate::value::Value;

/// Uses a fixed default when nothing was supplied.
///
/// The default is returned as is; it is not normalised through the wrapped
/// spec.
#[derive(Debug)]
pub struct Defaulted {
    spec: BoxedSpec,
    default: Value,
}

pub fn defaulted(spec: impl Spec + 'static, default: impl Into<Value>) -> Defaulted {
    Defaulted {
        spec: Box::new(spec),
        default: default.into(),
    }
}

impl Defaulted {
    pub fn spec(&self) -> &dyn Spec {
        self.spec.as_ref()
    }
}

impl Spec for Defaulted {
    fn default_value(&self) -> Option<Value> {
        Some(self.default.clone())
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        self.spec.normalise(meta, val)
    }
}

/// Fails when nothing was supplied.
#[derive(Debug)]
pub struct Required {
    spec: BoxedSpec,
}

pub fn required(spec: impl Spec + 'static) -> Required {
    Required {
        spec: Box::new(spec),
    }
}

impl Required {
    pub fn spec(&self) -> &dyn Spec {
        self.spec.as_ref()
    }
}

impl Spec for Required {
    fn normalise_empty(&self, meta: &Meta) -> SpecResult<Value> {
        Err(SpecError::bad_spec_value(
            meta.clone(),
            "Expected a value but got none",
        ))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        self.spec.normalise(meta, val)
    }
}

/// Keeps absence as absence, whatever the wrapped spec's default.
#[derive(Debug)]
pub struct OptionalSpec {
    spec: BoxedSpec,
}

pub fn optional_spec(spec: impl Spec + 'static) -> OptionalSpec {
    OptionalSpec {
        spec: Box::new(spec),
    }
}

impl OptionalSpec {
    pub fn spec(&self) -> &dyn Spec {
        self.spec.as_ref()
    }
}

impl Spec for OptionalSpec {
    fn normalise_empty(&self, _meta: &Meta) -> SpecResult<Value> {
        Ok(Value::NotSpecified)
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        self.spec.normalise(meta, val)
    }
}
