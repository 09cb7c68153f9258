//! Terminal specs that don't recurse into children.

use super::{BoxedSpec, Spec};
use crate::error::{SpecError, SpecResult};
use crate::meta::Meta;
use crate::value::Value;

const DEFAULT_CHOICE_REASON: &str = "Expected one of the available choices";

/// Returns whatever it is given, including absence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughSpec;

pub fn pass_through_spec() -> PassThroughSpec {
    PassThroughSpec
}

impl Spec for PassThroughSpec {
    fn normalise_filled(&self, _meta: &Meta, val: Value) -> SpecResult<Value> {
        Ok(val)
    }
}

/// Replaces any supplied value with a fixed result.
#[derive(Debug, Clone)]
pub struct AlwaysSameSpec {
    result: Value,
}

pub fn always_same_spec(result: impl Into<Value>) -> AlwaysSameSpec {
    AlwaysSameSpec {
        result: result.into(),
    }
}

impl Spec for AlwaysSameSpec {
    fn normalise_filled(&self, _meta: &Meta, _val: Value) -> SpecResult<Value> {
        Ok(self.result.clone())
    }
}

/// Always yields a fixed value, whether or not one was supplied.
#[derive(Debug, Clone)]
pub struct Overridden {
    value: Value,
}

pub fn overridden(value: impl Into<Value>) -> Overridden {
    Overridden {
        value: value.into(),
    }
}

impl Spec for Overridden {
    fn normalise_either(&self, _meta: &Meta, _val: &Value) -> SpecResult<Value> {
        Ok(self.value.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanSpec;

pub fn boolean() -> BooleanSpec {
    BooleanSpec
}

impl Spec for BooleanSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        match val {
            Value::Boolean(_) => Ok(val),
            other => Err(SpecError::bad_spec_value(meta.clone(), "Expected a boolean")
                .with_got_type(&other)),
        }
    }
}

/// A string, defaulting to `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSpec;

pub fn string_spec() -> StringSpec {
    StringSpec
}

fn expect_string(meta: &Meta, val: Value) -> SpecResult<String> {
    match val {
        Value::String(s) => Ok(s),
        other => {
            Err(SpecError::bad_spec_value(meta.clone(), "Expected a string").with_got_type(&other))
        }
    }
}

impl Spec for StringSpec {
    fn default_value(&self) -> Option<Value> {
        Some(Value::String(String::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        expect_string(meta, val).map(Value::String)
    }
}

/// A string passed through a chain of validators.
///
/// Each validator's output is the next validator's input.
#[derive(Debug, Default)]
pub struct ValidStringSpec {
    validators: Vec<BoxedSpec>,
}

pub fn valid_string_spec(validators: Vec<BoxedSpec>) -> ValidStringSpec {
    ValidStringSpec { validators }
}

impl ValidStringSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(mut self, validator: impl Spec + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn validators(&self) -> &[BoxedSpec] {
        &self.validators
    }
}

impl Spec for ValidStringSpec {
    fn default_value(&self) -> Option<Value> {
        Some(Value::String(String::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let mut val = Value::String(expect_string(meta, val)?);
        for validator in &self.validators {
            val = validator.normalise(meta, val)?;
        }
        Ok(val)
    }
}

/// A string from a fixed set of choices.
#[derive(Debug, Clone)]
pub struct StringChoiceSpec {
    choices: Vec<String>,
    reason: String,
}

pub fn string_choice_spec<I, S>(choices: I) -> StringChoiceSpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StringChoiceSpec::new(choices)
}

impl StringChoiceSpec {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            reason: DEFAULT_CHOICE_REASON.to_string(),
        }
    }

    /// Message used when the value isn't one of the choices.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Spec for StringChoiceSpec {
    fn default_value(&self) -> Option<Value> {
        Some(Value::String(String::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let s = expect_string(meta, val)?;
        if self.choices.contains(&s) {
            return Ok(Value::String(s));
        }
        Err(SpecError::bad_spec_value(meta.clone(), self.reason.clone())
            .with_available(self.choices.iter().cloned().map(Value::String).collect())
            .with_got_value(Value::String(s)))
    }
}

/// An integer. Booleans are not integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerSpec;

pub fn integer_spec() -> IntegerSpec {
    IntegerSpec
}

impl Spec for IntegerSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        match val {
            Value::Integer(_) => Ok(val),
            other => Err(SpecError::bad_spec_value(meta.clone(), "Expected an integer")
                .with_got_type(&other)),
        }
    }
}

/// A float; integers are widened.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatSpec;

pub fn float_spec() -> FloatSpec {
    FloatSpec
}

impl Spec for FloatSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        match val {
            Value::Float(_) => Ok(val),
            Value::Integer(i) => Ok(Value::Float(i as f64)),
            other => Err(SpecError::bad_spec_value(meta.clone(), "Expected a float")
                .with_got_type(&other)),
        }
    }
}

/// An integer from a fixed set of choices.
#[derive(Debug, Clone)]
pub struct IntegerChoiceSpec {
    choices: Vec<i64>,
    reason: String,
}

pub fn integer_choice_spec(choices: impl IntoIterator<Item = i64>) -> IntegerChoiceSpec {
    IntegerChoiceSpec {
        choices: choices.into_iter().collect(),
        reason: DEFAULT_CHOICE_REASON.to_string(),
    }
}

impl IntegerChoiceSpec {
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn choices(&self) -> &[i64] {
        &self.choices
    }
}

impl Spec for IntegerChoiceSpec {
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let i = match val {
            Value::Integer(i) => i,
            other => {
                return Err(SpecError::bad_spec_value(meta.clone(), "Expected an integer")
                    .with_got_type(&other));
            }
        };
        if self.choices.contains(&i) {
            return Ok(Value::Integer(i));
        }
        Err(SpecError::bad_spec_value(meta.clone(), self.reason.clone())
            .with_available(self.choices.iter().copied().map(Value::Integer).collect())
            .with_got_value(Value::Integer(i)))
    }
}

/// An explicit null; absence normalises to null as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneSpec;

pub fn none_spec() -> NoneSpec {
    NoneSpec
}

impl Spec for NoneSpec {
    fn default_value(&self) -> Option<Value> {
        Some(Value::Null)
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        match val {
            Value::Null => Ok(val),
            other => {
                Err(SpecError::bad_spec_value(meta.clone(), "Expected None").with_got_type(&other))
            }
        }
    }
}
