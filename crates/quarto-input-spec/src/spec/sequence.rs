//! Sequence-shaped and alternative specs.

use super::{BoxedSpec, Spec, collect_errors};
use crate::error::{Got, SpecError, SpecResult};
use crate::meta::Meta;
use crate::value::{Value, short_type_name};
use std::any::Any;
use std::fmt;

fn is_instance<T: Any>(val: &Value) -> bool {
    val.is_instance_of::<T>()
}

/// The kind of constructed object a [`ListOf`] must end up holding.
#[derive(Clone, Copy)]
pub struct Expect {
    type_name: &'static str,
    matches: fn(&Value) -> bool,
}

impl Expect {
    pub fn instance_of<T: Any>() -> Self {
        Self {
            type_name: short_type_name::<T>(),
            matches: is_instance::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn matches(&self, val: &Value) -> bool {
        (self.matches)(val)
    }
}

impl fmt::Debug for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expect<{}>", self.type_name)
    }
}

/// A list where every element is normalised by the same spec.
///
/// A single non-list value is treated as a one element list. With an
/// [`Expect`], elements that already are the expected object are kept as is
/// and every newly normalised element must be one.
#[derive(Debug)]
pub struct ListOf {
    spec: BoxedSpec,
    expect: Option<Expect>,
}

pub fn listof(spec: impl Spec + 'static) -> ListOf {
    ListOf::new(spec)
}

impl ListOf {
    pub fn new(spec: impl Spec + 'static) -> Self {
        Self {
            spec: Box::new(spec),
            expect: None,
        }
    }

    /// Require every element to end up as a `T`.
    pub fn expecting<T: Any>(mut self) -> Self {
        self.expect = Some(Expect::instance_of::<T>());
        self
    }

    pub fn spec(&self) -> &dyn Spec {
        self.spec.as_ref()
    }

    pub fn expect(&self) -> Option<Expect> {
        self.expect
    }
}

impl Spec for ListOf {
    fn default_value(&self) -> Option<Value> {
        Some(Value::List(Vec::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        if let Some(expect) = self.expect
            && expect.matches(&val)
        {
            return Ok(Value::List(vec![val]));
        }

        let items = match val {
            Value::List(items) => items,
            other => vec![other],
        };

        let mut result = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        let mut mismatches = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            if let Some(expect) = self.expect
                && expect.matches(&item)
            {
                result.push(item);
                continue;
            }

            let position = meta.indexed_at(index);
            tracing::trace!(%position, "normalising list item");
            match self.spec.normalise(&position, item) {
                Ok(normalised) => match self.expect {
                    Some(expect) if !expect.matches(&normalised) => mismatches.push(
                        SpecError::bad_spec_value(
                            position,
                            "Expected normaliser to create a specific object",
                        )
                        .with_expected(expect.type_name())
                        .with_got_value(normalised),
                    ),
                    _ => result.push(normalised),
                },
                Err(error) => errors.push(error),
            }
        }

        errors.extend(mismatches);
        collect_errors(meta, Value::List(result), errors)
    }
}

/// The first of several alternatives that accepts the value.
///
/// Every alternative sees the value as given, absent values included, so a
/// `required` alternative rejects absence and a `defaulted` one fills it.
#[derive(Debug, Default)]
pub struct OrSpec {
    specs: Vec<BoxedSpec>,
}

pub fn or_spec(specs: Vec<BoxedSpec>) -> OrSpec {
    OrSpec { specs }
}

impl OrSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(mut self, spec: impl Spec + 'static) -> Self {
        self.specs.push(Box::new(spec));
        self
    }

    pub fn specs(&self) -> &[BoxedSpec] {
        &self.specs
    }
}

impl Spec for OrSpec {
    fn normalise(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let mut errors = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            match spec.normalise(meta, val.clone()) {
                Ok(result) => return Ok(result),
                Err(error) => errors.push(error),
            }
        }

        tracing::debug!(%meta, count = errors.len(), "no alternative matched");
        Err(
            SpecError::bad_spec_value(meta.clone(), "Value doesn't match any of the options")
                .with_val(val)
                .with_errors(errors),
        )
    }
}

/// A fixed length list whose items each have their own spec.
#[derive(Debug, Default)]
pub struct TupleSpec {
    specs: Vec<BoxedSpec>,
}

pub fn tuple_spec(specs: Vec<BoxedSpec>) -> TupleSpec {
    TupleSpec { specs }
}

impl TupleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(mut self, spec: impl Spec + 'static) -> Self {
        self.specs.push(Box::new(spec));
        self
    }

    pub fn specs(&self) -> &[BoxedSpec] {
        &self.specs
    }
}

impl Spec for TupleSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let items = match val {
            Value::List(items) => items,
            other => {
                return Err(SpecError::bad_spec_value(meta.clone(), "Expected a tuple")
                    .with_got_type(&other));
            }
        };

        if items.len() != self.specs.len() {
            let got = i64::try_from(items.len()).unwrap_or(i64::MAX);
            return Err(SpecError::bad_spec_value(
                meta.clone(),
                "Expected tuple to be of a particular length",
            )
            .with_expected(self.specs.len().to_string())
            .with_got(Got::Value(Value::Integer(got))));
        }

        let mut result = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, (spec, item)) in self.specs.iter().zip(items).enumerate() {
            match spec.normalise(&meta.indexed_at(index), item) {
                Ok(normalised) => result.push(normalised),
                Err(error) => errors.push(error),
            }
        }

        collect_errors(meta, Value::List(result), errors)
    }
}

type Wrapper = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// Normalises through a spec, then wraps the result in a constructed object.
pub struct ContainerSpec {
    spec: BoxedSpec,
    wrap: Wrapper,
    type_name: &'static str,
}

pub fn container_spec<T: Any + Send + Sync>(
    spec: impl Spec + 'static,
    wrap: impl Fn(Value) -> T + Send + Sync + 'static,
) -> ContainerSpec {
    ContainerSpec {
        spec: Box::new(spec),
        wrap: Box::new(move |val| Value::object(wrap(val))),
        type_name: short_type_name::<T>(),
    }
}

impl ContainerSpec {
    pub fn spec(&self) -> &dyn Spec {
        self.spec.as_ref()
    }
}

impl fmt::Debug for ContainerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerSpec")
            .field("kls", &self.type_name)
            .field("spec", &self.spec)
            .finish()
    }
}

impl Spec for ContainerSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let normalised = self.spec.normalise(meta, val)?;
        Ok((self.wrap)(normalised))
    }
}
