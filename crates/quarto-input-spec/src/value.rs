//! Value model for raw and normalised configuration values.
//!
//! Raw configuration arrives loosely typed (from YAML, JSON, or layered
//! [`MergedOptions`]). Specs consume a [`Value`] and produce a [`Value`]; the
//! only variant that never comes from parsed input is [`Value::Object`], which
//! holds objects constructed by specs such as `create_spec`.
//!
//! # Absence
//!
//! [`Value::NotSpecified`] is the sentinel meaning "nothing was supplied for
//! this field". It is distinct from `Null`, from an empty string, and from an
//! empty mapping, and it is the `Default` for `Value`.

use crate::merged::MergedOptions;
use indexmap::IndexMap;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use yaml_rust2::Yaml;

/// An insertion-ordered mapping of string keys to values.
pub type Mapping = IndexMap<String, Value>;

/// A configuration value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Nothing was supplied.
    #[default]
    NotSpecified,
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Mapping),
    /// A layered mapping that flattens into a plain [`Mapping`].
    Merged(MergedOptions),
    /// An object constructed during normalisation.
    Object(Instance),
}

/// A type-erased object produced by a spec.
///
/// Cloning an `Instance` shares the underlying object, and two instances are
/// equal only when they share it.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: short_type_name::<T>(),
        }
    }

    /// The (unqualified) Rust type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether both instances wrap the very same object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance<{}>", self.type_name)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Strip the module path from `std::any::type_name`, keeping generics intact.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// The "type of" a value, as reported in `got` fields of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    NotSpecified,
    Null,
    Boolean,
    Integer,
    Float,
    String,
    List,
    Dictionary,
    Object(&'static str),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::NotSpecified => "NotSpecified",
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Dictionary => "dictionary",
            ValueType::Object(name) => name,
        };
        write!(f, "{}", name)
    }
}

impl Value {
    /// Wrap an arbitrary object as a value.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Instance::new(value))
    }

    pub fn is_not_specified(&self) -> bool {
        matches!(self, Value::NotSpecified)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::NotSpecified => ValueType::NotSpecified,
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::List(_) => ValueType::List,
            Value::Map(_) | Value::Merged(_) => ValueType::Dictionary,
            Value::Object(instance) => ValueType::Object(instance.type_name()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Snapshot this value as a plain mapping.
    ///
    /// Plain maps are cloned and merged options are flattened; every other
    /// value yields `None`.
    pub fn as_mapping(&self) -> Option<Mapping> {
        match self {
            Value::Map(map) => Some(map.clone()),
            Value::Merged(merged) => Some(merged.as_dict()),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn is_instance_of<T: Any>(&self) -> bool {
        self.as_instance().is_some_and(Instance::is::<T>)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_instance().and_then(Instance::downcast_ref::<T>)
    }

    /// Convert into JSON.
    ///
    /// Fails for the sentinel, for constructed objects, and for floats that
    /// JSON cannot represent.
    pub fn to_json(&self) -> Result<serde_json::Value, ToJsonError> {
        Ok(match self {
            Value::NotSpecified => return Err(ToJsonError::NotSpecified),
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or(ToJsonError::NonFiniteFloat(*f))?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Map(map) => mapping_to_json(map)?,
            Value::Merged(merged) => mapping_to_json(&merged.as_dict())?,
            Value::Object(instance) => return Err(ToJsonError::Object(instance.type_name())),
        })
    }
}

fn mapping_to_json(map: &Mapping) -> Result<serde_json::Value, ToJsonError> {
    let mut out = serde_json::Map::new();
    for (key, value) in map {
        out.insert(key.clone(), value.to_json()?);
    }
    Ok(serde_json::Value::Object(out))
}

/// Reasons a [`Value`] cannot be expressed as JSON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToJsonError {
    #[error("NotSpecified has no JSON representation")]
    NotSpecified,
    #[error("constructed object of type {0} has no JSON representation")]
    Object(&'static str),
    #[error("float {0} has no JSON representation")]
    NonFiniteFloat(f64),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::NotSpecified, Value::NotSpecified) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(_) | Value::Merged(_), Value::Map(_) | Value::Merged(_)) => {
                self.as_mapping() == other.as_mapping()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::NotSpecified => write!(f, "<NotSpecified>"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => fmt_mapping(map, f),
            Value::Merged(merged) => fmt_mapping(&merged.as_dict(), f),
            Value::Object(instance) => write!(f, "<{}>", instance.type_name()),
        }
    }
}

fn fmt_mapping(map: &Mapping, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{:?}: {}", key, value)?;
    }
    write!(f, "}}")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl From<MergedOptions> for Value {
    fn from(merged: MergedOptions) -> Self {
        Value::Merged(merged)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Yaml> for Value {
    fn from(yaml: &Yaml) -> Self {
        match yaml {
            Yaml::Null | Yaml::BadValue | Yaml::Alias(_) => Value::Null,
            Yaml::Boolean(b) => Value::Boolean(*b),
            Yaml::Integer(i) => Value::Integer(*i),
            Yaml::Real(s) => Value::Float(s.parse::<f64>().unwrap_or(f64::NAN)),
            Yaml::String(s) => Value::String(s.clone()),
            Yaml::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            Yaml::Hash(entries) => {
                let mut map = Mapping::new();
                for (key, value) in entries {
                    match yaml_key(key) {
                        Some(key) => {
                            map.insert(key, Value::from(value));
                        }
                        None => tracing::trace!(?key, "skipping non-scalar mapping key"),
                    }
                }
                Value::Map(map)
            }
        }
    }
}

/// Mapping keys are strings; scalar YAML keys are stringified.
fn yaml_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        _ => None,
    }
}
