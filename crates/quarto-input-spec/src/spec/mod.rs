//! Specs: composable normalisation rules.
//!
//! A spec turns a raw [`Value`] into a normalised [`Value`], or fails with a
//! [`SpecError`] pointing at the [`Meta`] position of the problem. Concrete
//! specs implement only the branches they care about; [`Spec::normalise`]
//! decides which branch runs:
//!
//! 1. [`Spec::normalise_either`] is consulted first. Any result other than
//!    [`Value::NotSpecified`] is final.
//! 2. If the value is absent, [`Spec::normalise_empty`] runs. Unless a spec
//!    overrides it, this returns [`Spec::default_value`], or the sentinel
//!    itself when there is no default.
//! 3. If the value is present, [`Spec::normalise_filled`] runs. Unless a spec
//!    overrides it, this fails with a `BadSpec` error.
//!
//! # Example
//!
//! ```rust
//! use quarto_input_spec::spec::{boolean, dictof, listof, string_spec};
//! use quarto_input_spec::{Meta, Spec, Value};
//!
//! let spec = dictof(string_spec(), listof(boolean()));
//! let raw = Value::from(serde_json::json!({"toc": true, "flags": [false, true]}));
//!
//! let normalised = spec.normalise(&Meta::new("_quarto.yml"), raw).unwrap();
//! let map = normalised.as_mapping().unwrap();
//! assert_eq!(map["toc"], Value::from(vec![true]));
//!
//! let err = spec
//!     .normalise(&Meta::empty(), Value::from(serde_json::json!({"toc": "yes"})))
//!     .unwrap_err();
//! assert_eq!(err.leaves()[0].message.as_deref(), Some("Expected a boolean"));
//! ```

mod dict;
mod leaf;
mod paths;
mod presence;
mod sequence;

#[cfg(test)]
pub(crate) mod testing;

pub use dict::{
    CreateSpec, DictFromBoolSpec, DictOf, DictionarySpec, FromOptions, SetOptions, create_spec,
    dict_from_bool_spec, dictionary_spec, dictof, set_options,
};
pub use leaf::{
    AlwaysSameSpec, BooleanSpec, FloatSpec, IntegerChoiceSpec, IntegerSpec, NoneSpec, Overridden,
    PassThroughSpec, StringChoiceSpec, StringSpec, ValidStringSpec, always_same_spec, boolean,
    float_spec, integer_choice_spec, integer_spec, none_spec, overridden, pass_through_spec,
    string_choice_spec, string_spec, valid_string_spec,
};
pub use paths::{DirectorySpec, FilenameSpec, directory_spec, filename_spec};
pub use presence::{Defaulted, OptionalSpec, Required, defaulted, optional_spec, required};
pub use sequence::{
    ContainerSpec, Expect, ListOf, OrSpec, TupleSpec, container_spec, listof, or_spec, tuple_spec,
};

use crate::error::{SpecError, SpecResult};
use crate::meta::Meta;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A boxed spec, as stored by composite specs.
pub type BoxedSpec = Box<dyn Spec>;

/// A normalisation rule.
///
/// Specs are immutable configuration: build the tree once, then call
/// [`Spec::normalise`] on the root for every raw value.
pub trait Spec: fmt::Debug + Send + Sync {
    /// Combined handler for both absent and present values.
    ///
    /// Returning [`Value::NotSpecified`] means "not handled here".
    fn normalise_either(&self, _meta: &Meta, _val: &Value) -> SpecResult<Value> {
        Ok(Value::NotSpecified)
    }

    /// Value used when nothing was supplied and `normalise_empty` isn't
    /// overridden.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Handler for an absent value.
    fn normalise_empty(&self, _meta: &Meta) -> SpecResult<Value> {
        Ok(self.default_value().unwrap_or_default())
    }

    /// Handler for a supplied value.
    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        Err(SpecError::bad_spec(meta.clone(), val))
    }

    /// Normalise `val`, found at position `meta`.
    fn normalise(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        dispatch(self, meta, val)
    }
}

/// The base protocol behind [`Spec::normalise`].
pub fn dispatch<S: Spec + ?Sized>(spec: &S, meta: &Meta, val: Value) -> SpecResult<Value> {
    let either = spec.normalise_either(meta, &val)?;
    if !either.is_not_specified() {
        tracing::trace!(%meta, branch = "either", "normalised");
        return Ok(either);
    }

    if val.is_not_specified() {
        tracing::trace!(%meta, branch = "empty", "normalising");
        spec.normalise_empty(meta)
    } else {
        tracing::trace!(%meta, branch = "filled", "normalising");
        spec.normalise_filled(meta, val)
    }
}

impl<S: Spec + ?Sized> Spec for Box<S> {
    fn normalise_either(&self, meta: &Meta, val: &Value) -> SpecResult<Value> {
        (**self).normalise_either(meta, val)
    }

    fn default_value(&self) -> Option<Value> {
        (**self).default_value()
    }

    fn normalise_empty(&self, meta: &Meta) -> SpecResult<Value> {
        (**self).normalise_empty(meta)
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        (**self).normalise_filled(meta, val)
    }

    fn normalise(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        (**self).normalise(meta, val)
    }
}

impl<S: Spec + ?Sized> Spec for Arc<S> {
    fn normalise_either(&self, meta: &Meta, val: &Value) -> SpecResult<Value> {
        (**self).normalise_either(meta, val)
    }

    fn default_value(&self) -> Option<Value> {
        (**self).default_value()
    }

    fn normalise_empty(&self, meta: &Meta) -> SpecResult<Value> {
        (**self).normalise_empty(meta)
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        (**self).normalise_filled(meta, val)
    }

    fn normalise(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        (**self).normalise(meta, val)
    }
}

/// Fail unless `val` is a mapping (plain or merged), returning a flat snapshot.
pub(crate) fn expect_mapping(meta: &Meta, val: &Value) -> SpecResult<crate::value::Mapping> {
    val.as_mapping().ok_or_else(|| {
        SpecError::bad_spec_value(meta.clone(), "Expected a dictionary").with_got_type(val)
    })
}

/// Turn collected child failures into the composite's result.
pub(crate) fn collect_errors<T>(meta: &Meta, value: T, errors: Vec<SpecError>) -> SpecResult<T> {
    if errors.is_empty() {
        Ok(value)
    } else {
        tracing::debug!(%meta, count = errors.len(), "raising aggregated errors");
        Err(SpecError::aggregate(meta.clone(), errors))
    }
}
