//! Dictionary-shaped specs.
//!
//! All of these accept either a plain [`Mapping`] or [`MergedOptions`]
//! (which they see as its flattened snapshot), and reject anything else
//! with "Expected a dictionary".
//!
//! [`MergedOptions`]: crate::MergedOptions

use super::{BoxedSpec, Spec, collect_errors, expect_mapping};
use crate::error::{SpecError, SpecResult};
use crate::meta::Meta;
use crate::value::{Mapping, Value, short_type_name};
use indexmap::IndexMap;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// Any mapping, defaulting to an empty one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionarySpec;

pub fn dictionary_spec() -> DictionarySpec {
    DictionarySpec
}

impl Spec for DictionarySpec {
    fn default_value(&self) -> Option<Value> {
        Some(Value::Map(Mapping::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        expect_mapping(meta, &val).map(Value::Map)
    }
}

/// A mapping whose every key and every value are normalised.
///
/// Keys and values are both normalised at `meta.at(key)`. Key failures are
/// reported before value failures, each in entry order. Two keys that
/// normalise to the same name are a key failure at the later key.
#[derive(Debug)]
pub struct DictOf {
    name_spec: BoxedSpec,
    value_spec: BoxedSpec,
}

pub fn dictof(name_spec: impl Spec + 'static, value_spec: impl Spec + 'static) -> DictOf {
    DictOf {
        name_spec: Box::new(name_spec),
        value_spec: Box::new(value_spec),
    }
}

impl DictOf {
    pub fn name_spec(&self) -> &dyn Spec {
        self.name_spec.as_ref()
    }

    pub fn value_spec(&self) -> &dyn Spec {
        self.value_spec.as_ref()
    }
}

impl Spec for DictOf {
    fn default_value(&self) -> Option<Value> {
        Some(Value::Map(Mapping::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let entries = expect_mapping(meta, &val)?;

        let mut result = Mapping::with_capacity(entries.len());
        let mut names = HashSet::with_capacity(entries.len());
        let mut key_errors = Vec::new();
        let mut value_errors = Vec::new();

        for (key, value) in entries {
            let position = meta.at(key.as_str());
            tracing::trace!(%position, "normalising dictionary entry");

            let name = match self.name_spec.normalise(&position, Value::String(key)) {
                Ok(Value::String(name)) if names.contains(&name) => {
                    tracing::debug!(%position, %name, "normalised key collides");
                    key_errors.push(
                        SpecError::bad_spec_value(
                            position.clone(),
                            "Normalised key collides with an earlier key",
                        )
                        .with_got_value(Value::String(name)),
                    );
                    None
                }
                Ok(Value::String(name)) => {
                    names.insert(name.clone());
                    Some(name)
                }
                Ok(other) => {
                    key_errors.push(
                        SpecError::bad_spec_value(
                            position.clone(),
                            "Expected normalised key to be a string",
                        )
                        .with_got_type(&other),
                    );
                    None
                }
                Err(error) => {
                    key_errors.push(error);
                    None
                }
            };

            match self.value_spec.normalise(&position, value) {
                Ok(value) => {
                    if let Some(name) = name {
                        result.insert(name, value);
                    }
                }
                Err(error) => value_errors.push(error),
            }
        }

        key_errors.extend(value_errors);
        collect_errors(meta, Value::Map(result), key_errors)
    }
}

/// Normalises the known options of a mapping, passing other keys through.
///
/// Known options are normalised at the same position as the mapping
/// itself, not at a per-key child position. Known options that are absent
/// from the input are left absent.
#[derive(Debug, Default)]
pub struct SetOptions {
    options: IndexMap<String, BoxedSpec>,
}

pub fn set_options() -> SetOptions {
    SetOptions::new()
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, name: impl Into<String>, spec: impl Spec + 'static) -> Self {
        self.options.insert(name.into(), Box::new(spec));
        self
    }

    pub fn options(&self) -> &IndexMap<String, BoxedSpec> {
        &self.options
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }
}

impl Spec for SetOptions {
    fn default_value(&self) -> Option<Value> {
        Some(Value::Map(Mapping::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let mut values = expect_mapping(meta, &val)?;
        let mut errors = Vec::new();

        for (name, spec) in &self.options {
            if let Some(slot) = values.get_mut(name) {
                tracing::trace!(%meta, option = %name, "normalising known option");
                let raw = std::mem::take(slot);
                match spec.normalise(meta, raw) {
                    Ok(normalised) => *slot = normalised,
                    Err(error) => errors.push(error),
                }
            }
        }

        collect_errors(meta, Value::Map(values), errors)
    }
}

/// Types that `create_spec` can construct from normalised options.
pub trait FromOptions: Any + Send + Sync + Sized {
    /// Build from the normalised options.
    ///
    /// `options` only holds keys that `create_spec` knows about and that
    /// were present in the input.
    fn from_options(meta: &Meta, options: Mapping) -> SpecResult<Self>;
}

/// Constructs a `T` from a mapping of options.
///
/// A value that already is a `T` is returned unchanged. No value at all
/// constructs a `T` from an empty option table.
pub struct CreateSpec<T> {
    expected: SetOptions,
    _kls: PhantomData<fn() -> T>,
}

pub fn create_spec<T: FromOptions>() -> CreateSpec<T> {
    CreateSpec {
        expected: SetOptions::new(),
        _kls: PhantomData,
    }
}

impl<T: FromOptions> CreateSpec<T> {
    pub fn with_option(mut self, name: impl Into<String>, spec: impl Spec + 'static) -> Self {
        self.expected = self.expected.with_option(name, spec);
        self
    }

    /// The spec the raw mapping is normalised through.
    pub fn expected_spec(&self) -> &SetOptions {
        &self.expected
    }

    fn construct(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        let mut options = match self.expected.normalise(meta, val)? {
            Value::Map(options) => options,
            other => return Err(SpecError::bad_spec(meta.clone(), other)),
        };
        options.retain(|name, _| self.expected.contains(name));

        T::from_options(meta, options).map(Value::object)
    }
}

impl<T> fmt::Debug for CreateSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateSpec")
            .field("kls", &short_type_name::<T>())
            .field("expected", &self.expected)
            .finish()
    }
}

impl<T: FromOptions> Spec for CreateSpec<T> {
    fn normalise_empty(&self, meta: &Meta) -> SpecResult<Value> {
        self.construct(meta, Value::NotSpecified)
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        if val.is_instance_of::<T>() {
            return Ok(val);
        }
        self.construct(meta, val)
    }
}

type DictMaker = Box<dyn Fn(&Meta, bool) -> Mapping + Send + Sync>;

/// Lets a boolean stand in for a mapping.
///
/// `thing: true` is turned into a mapping by `dict_maker` before being
/// normalised by `spec`; no value at all is normalised as an empty mapping.
pub struct DictFromBoolSpec {
    dict_maker: DictMaker,
    spec: BoxedSpec,
}

pub fn dict_from_bool_spec(
    dict_maker: impl Fn(&Meta, bool) -> Mapping + Send + Sync + 'static,
    spec: impl Spec + 'static,
) -> DictFromBoolSpec {
    DictFromBoolSpec {
        dict_maker: Box::new(dict_maker),
        spec: Box::new(spec),
    }
}

impl DictFromBoolSpec {
    pub fn spec(&self) -> &dyn Spec {
        self.spec.as_ref()
    }
}

impl fmt::Debug for DictFromBoolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictFromBoolSpec")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl Spec for DictFromBoolSpec {
    fn normalise_empty(&self, meta: &Meta) -> SpecResult<Value> {
        self.spec.normalise(meta, Value::Map(Mapping::new()))
    }

    fn normalise_filled(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        match val {
            Value::Boolean(flag) => {
                let made = (self.dict_maker)(meta, flag);
                self.spec.normalise(meta, Value::Map(made))
            }
            other => self.spec.normalise(meta, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Got, SpecErrorKind};
    use crate::merged::MergedOptions;
    use crate::spec::leaf::{integer_spec, pass_through_spec};
    use crate::spec::testing::FnSpec;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn map(entries: Vec<(&str, Value)>) -> Mapping {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[derive(Debug)]
    struct Thing;

    fn not_dictionaries() -> Vec<Value> {
        vec![
            Value::from(0),
            Value::from(1),
            Value::from(true),
            Value::from(false),
            Value::List(vec![]),
            Value::from(vec![1]),
            Value::from(""),
            Value::from("asdf"),
            Value::object(Thing),
        ]
    }

    fn dictionary_like_specs() -> Vec<BoxedSpec> {
        vec![
            Box::new(dictionary_spec()),
            Box::new(dictof(pass_through_spec(), pass_through_spec())),
            Box::new(set_options()),
        ]
    }

    #[test]
    fn test_dictionary_specs_default_to_empty_dictionary() {
        for spec in dictionary_like_specs() {
            assert_eq!(spec.default_value(), Some(Value::Map(Mapping::new())));
            assert_eq!(
                spec.normalise(&Meta::empty(), Value::NotSpecified).unwrap(),
                Value::Map(Mapping::new())
            );
        }
    }

    #[test]
    fn test_dictionary_specs_complain_about_non_dictionaries() {
        let meta = Meta::empty().at("format");
        for spec in dictionary_like_specs() {
            for val in not_dictionaries() {
                let expected = val.value_type();
                let err = spec.normalise(&meta, val).unwrap_err();
                assert_eq!(err.kind, SpecErrorKind::BadSpecValue);
                assert_eq!(err.message.as_deref(), Some("Expected a dictionary"));
                assert_eq!(err.meta, meta);
                assert_eq!(err.got, Some(Got::Type(expected)));
            }
        }
    }

    #[test]
    fn test_dictionary_specs_accept_dicts_and_merged_options() {
        let plain = map(vec![("a", Value::from(1)), ("b", Value::from(2))]);
        let merged = MergedOptions::using(vec![
            map(vec![("a", Value::from(1)), ("b", Value::from(2))]),
            map(vec![("c", Value::from(3)), ("b", Value::from(4))]),
        ]);
        let flattened = map(vec![
            ("a", Value::from(1)),
            ("b", Value::from(4)),
            ("c", Value::from(3)),
        ]);

        for spec in dictionary_like_specs() {
            assert_eq!(
                spec.normalise(&Meta::empty(), Value::Map(plain.clone())).unwrap(),
                Value::Map(plain.clone())
            );
            let result = spec
                .normalise(&Meta::empty(), Value::Merged(merged.clone()))
                .unwrap();
            assert!(matches!(result, Value::Map(_)));
            assert_eq!(result, Value::Map(flattened.clone()));
        }
    }

    #[test]
    fn test_dictof_complains_about_keys() {
        let meta = Meta::new("_quarto.yml");
        let error_one = SpecError::bad_spec_value(meta.at("one"), "one");
        let error_three = SpecError::bad_spec_value(meta.at("three"), "three");
        let (e1, e3) = (error_one.clone(), error_three.clone());
        let name_spec = FnSpec::new(move |_, val| match val.as_str() {
            Some("one") => Err(e1.clone()),
            Some("three") => Err(e3.clone()),
            _ => Ok(val),
        });
        let calls = name_spec.calls();

        let spec = dictof(name_spec, pass_through_spec());
        let input = map(vec![
            ("one", Value::from(1)),
            ("two", Value::from(2)),
            ("three", Value::from(3)),
        ]);
        let err = spec.normalise(&meta, Value::Map(input)).unwrap_err();

        assert_eq!(err.kind, SpecErrorKind::BadSpecValue);
        assert_eq!(err.meta, meta);
        assert_eq!(err.errors, vec![error_one, error_three]);

        let positions: Vec<Meta> = calls.get().into_iter().map(|(m, _)| m).collect();
        assert_eq!(positions, vec![meta.at("one"), meta.at("two"), meta.at("three")]);
    }

    #[test]
    fn test_dictof_complains_about_values() {
        let meta = Meta::empty();
        let error_two = SpecError::bad_spec_value(meta.at("two"), "two");
        let error_four = SpecError::bad_spec_value(meta.at("four"), "four");
        let (e2, e4) = (error_two.clone(), error_four.clone());
        let value_spec = FnSpec::new(move |_, val| match val.as_i64() {
            Some(2) => Err(e2.clone()),
            Some(4) => Err(e4.clone()),
            _ => Ok(val),
        });

        let spec = dictof(pass_through_spec(), value_spec);
        let input = map(vec![
            ("one", Value::from(1)),
            ("two", Value::from(2)),
            ("three", Value::from(3)),
            ("four", Value::from(4)),
        ]);
        let err = spec.normalise(&meta, Value::Map(input)).unwrap_err();
        assert_eq!(err.meta, meta);
        assert_eq!(err.errors, vec![error_two, error_four]);
    }

    #[test]
    fn test_dictof_reports_key_errors_before_value_errors() {
        let meta = Meta::empty();
        let name_spec = FnSpec::new(|meta, val| match val.as_str() {
            Some("b") => Err(SpecError::bad_spec_value(meta.clone(), "bad key")),
            _ => Ok(val),
        });
        let spec = dictof(name_spec, integer_spec());
        let input = map(vec![("a", Value::from("x")), ("b", Value::from(2))]);
        let err = spec.normalise(&meta, Value::Map(input)).unwrap_err();

        let messages: Vec<_> = err.errors.iter().map(|e| e.message.clone().unwrap()).collect();
        assert_eq!(messages, vec!["bad key", "Expected an integer"]);
        assert_eq!(err.errors[0].meta, meta.at("b"));
        assert_eq!(err.errors[1].meta, meta.at("a"));
    }

    #[test]
    fn test_dictof_only_reports_failing_entries() {
        let spec = dictof(pass_through_spec(), integer_spec());
        let input = map(vec![("a", Value::from(1)), ("bad", Value::from("2"))]);
        let err = spec.normalise(&Meta::empty(), Value::Map(input)).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].meta, Meta::empty().at("bad"));
    }

    #[test]
    fn test_dictof_normalises_keys_and_values() {
        let upper = FnSpec::new(|_, val| Ok(Value::from(val.as_str().unwrap_or_default().to_uppercase())));
        let spec = dictof(upper, integer_spec());
        let input = map(vec![("a", Value::from(1)), ("b", Value::from(2))]);
        assert_eq!(
            spec.normalise(&Meta::empty(), Value::Map(input)).unwrap(),
            Value::Map(map(vec![("A", Value::from(1)), ("B", Value::from(2))]))
        );
    }

    #[test]
    fn test_dictof_complains_about_colliding_keys() {
        let upper = FnSpec::new(|_, val| Ok(Value::from(val.as_str().unwrap_or_default().to_uppercase())));
        let meta = Meta::new("_quarto.yml").at("format");
        let input = map(vec![
            ("html", Value::from(1)),
            ("pdf", Value::from(2)),
            ("HTML", Value::from(3)),
        ]);
        let err = dictof(upper, integer_spec())
            .normalise(&meta, Value::Map(input))
            .unwrap_err();

        assert_eq!(err.meta, meta);
        assert_eq!(
            err.errors,
            vec![
                SpecError::bad_spec_value(
                    meta.at("HTML"),
                    "Normalised key collides with an earlier key"
                )
                .with_got_value(Value::from("HTML"))
            ]
        );
    }

    #[test]
    fn test_dictof_collision_counts_keys_whose_value_failed() {
        let upper = FnSpec::new(|_, val| Ok(Value::from(val.as_str().unwrap_or_default().to_uppercase())));
        let input = map(vec![("a", Value::from("x")), ("A", Value::from(2))]);
        let err = dictof(upper, integer_spec())
            .normalise(&Meta::empty(), Value::Map(input))
            .unwrap_err();

        let messages: Vec<_> = err.errors.iter().map(|e| e.message.clone().unwrap()).collect();
        assert_eq!(
            messages,
            vec!["Normalised key collides with an earlier key", "Expected an integer"]
        );
    }

    #[test]
    fn test_dictof_requires_string_keys() {
        let spec = dictof(FnSpec::returning(Value::from(1)), pass_through_spec());
        let input = map(vec![("a", Value::from(1))]);
        let err = spec.normalise(&Meta::empty(), Value::Map(input)).unwrap_err();
        assert_eq!(
            err.errors[0].message.as_deref(),
            Some("Expected normalised key to be a string")
        );
    }

    #[test]
    fn test_set_options_takes_options() {
        let spec = set_options()
            .with_option("a", pass_through_spec())
            .with_option("b", integer_spec());
        let names: Vec<&str> = spec.options().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(spec.contains("a"));
        assert!(!spec.contains("c"));
    }

    #[test]
    fn test_set_options_checks_known_options() {
        let meta = Meta::new("_quarto.yml").at("project");
        let one = FnSpec::returning(Value::from("one_spec_result"));
        let two = FnSpec::returning(Value::from("two_spec_result"));
        let (one_calls, two_calls) = (one.calls(), two.calls());

        let spec = set_options().with_option("one", one).with_option("two", two);
        let input = map(vec![
            ("one", Value::from(1)),
            ("two", Value::from(2)),
            ("three", Value::from(3)),
        ]);
        assert_eq!(
            spec.normalise(&meta, Value::Map(input)).unwrap(),
            Value::Map(map(vec![
                ("one", Value::from("one_spec_result")),
                ("two", Value::from("two_spec_result")),
                ("three", Value::from(3)),
            ]))
        );

        // known options share the parent position
        assert_eq!(one_calls.get(), vec![(meta.clone(), Value::from(1))]);
        assert_eq!(two_calls.get(), vec![(meta, Value::from(2))]);
    }

    #[test]
    fn test_set_options_leaves_absent_options_absent() {
        let missing = FnSpec::returning(Value::from("made up"));
        let calls = missing.calls();
        let spec = set_options().with_option("missing", missing);
        let input = map(vec![("present", Value::from(1))]);
        assert_eq!(
            spec.normalise(&Meta::empty(), Value::Map(input.clone())).unwrap(),
            Value::Map(input)
        );
        assert!(calls.get().is_empty());
    }

    #[test]
    fn test_set_options_collects_errors() {
        let meta = Meta::empty();
        let one_error = SpecError::bad_spec_value(meta.clone(), "Bad one");
        let two_error = SpecError::bad_spec_value(meta.clone(), "Bad two");
        let spec = set_options()
            .with_option("one", FnSpec::failing(one_error.clone()))
            .with_option("two", FnSpec::failing(two_error.clone()));
        let input = map(vec![
            ("one", Value::from(1)),
            ("two", Value::from(2)),
            ("three", Value::from(3)),
        ]);
        let err = spec.normalise(&meta, Value::Map(input)).unwrap_err();
        assert_eq!(err.meta, meta);
        assert_eq!(err.errors, vec![one_error, two_error]);
    }

    #[derive(Debug)]
    struct Blah;

    impl FromOptions for Blah {
        fn from_options(_meta: &Meta, _options: Mapping) -> SpecResult<Self> {
            Ok(Blah)
        }
    }

    #[derive(Debug)]
    struct Meh {
        a: Value,
        b: Value,
        seen: Vec<String>,
    }

    impl FromOptions for Meh {
        fn from_options(meta: &Meta, mut options: Mapping) -> SpecResult<Self> {
            let seen = options.keys().cloned().collect();
            let a = options
                .shift_remove("a")
                .ok_or_else(|| SpecError::bad_spec_value(meta.clone(), "Missing a"))?;
            let b = options.shift_remove("b").unwrap_or_default();
            Ok(Meh { a, b, seen })
        }
    }

    #[test]
    fn test_create_spec_returns_existing_instance() {
        let instance = Value::object(Blah);
        let result = create_spec::<Blah>()
            .normalise(&Meta::empty(), instance.clone())
            .unwrap();
        assert_eq!(result, instance);
        assert!(result.as_instance().unwrap().ptr_eq(instance.as_instance().unwrap()));
    }

    #[test]
    fn test_create_spec_constructs_from_options() {
        let result = create_spec::<Blah>()
            .normalise(&Meta::empty(), Value::Map(Mapping::new()))
            .unwrap();
        assert!(result.is_instance_of::<Blah>());

        let spec = create_spec::<Meh>()
            .with_option("a", pass_through_spec())
            .with_option("b", pass_through_spec());
        assert_eq!(spec.expected_spec().options().len(), 2);

        let input = map(vec![
            ("a", Value::from("a_val")),
            ("b", Value::from("b_val")),
            ("c", Value::from("c_val")),
        ]);
        let result = spec.normalise(&Meta::empty(), Value::Map(input)).unwrap();
        let meh = result.downcast_ref::<Meh>().unwrap();
        assert_eq!(meh.a, Value::from("a_val"));
        assert_eq!(meh.b, Value::from("b_val"));
        assert_eq!(meh.seen, vec!["a", "b"]);
    }

    #[test]
    fn test_create_spec_passes_through_option_errors() {
        let meta = Meta::empty().at("server");
        let spec_error = SpecError::bad_spec_value(meta.clone(), "nope!");
        let spec = create_spec::<Meh>().with_option("a", FnSpec::failing(spec_error.clone()));
        let input = map(vec![("a", Value::from("a_val"))]);
        let err = spec.normalise(&meta, Value::Map(input)).unwrap_err();
        assert_eq!(err, SpecError::aggregate(meta, vec![spec_error]));
    }

    #[test]
    fn test_create_spec_propagates_constructor_errors() {
        let spec = create_spec::<Meh>().with_option("a", pass_through_spec());
        let err = spec
            .normalise(&Meta::empty(), Value::Map(Mapping::new()))
            .unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Missing a"));
    }

    #[test]
    fn test_create_spec_constructs_when_absent() {
        let result = create_spec::<Blah>()
            .normalise(&Meta::empty(), Value::NotSpecified)
            .unwrap();
        assert!(result.is_instance_of::<Blah>());
    }

    #[test]
    fn test_create_spec_reports_constructor_errors_when_absent() {
        let meta = Meta::empty().at("server");
        let spec = create_spec::<Meh>().with_option("a", pass_through_spec());
        let err = spec.normalise(&meta, Value::NotSpecified).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Missing a"));
        assert_eq!(err.meta, meta);
    }

    #[test]
    fn test_create_spec_rejects_non_dictionaries() {
        let err = create_spec::<Blah>()
            .normalise(&Meta::empty(), Value::from(3))
            .unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Expected a dictionary"));
    }

    #[test]
    fn test_dict_from_bool_uses_empty_dictionary_when_absent() {
        let inner = FnSpec::returning(Value::from("result"));
        let calls = inner.calls();
        let spec = dict_from_bool_spec(|_, _| panic!("dict_maker not expected"), inner);
        let meta = Meta::empty().at("toc");
        assert_eq!(
            spec.normalise(&meta, Value::NotSpecified).unwrap(),
            Value::from("result")
        );
        assert_eq!(calls.get(), vec![(meta, Value::Map(Mapping::new()))]);
    }

    #[test]
    fn test_dict_from_bool_uses_dict_maker_for_booleans() {
        let made: Arc<Mutex<Vec<(Meta, bool)>>> = Arc::default();
        let log = made.clone();
        let dict_maker = move |meta: &Meta, flag: bool| {
            log.lock().unwrap().push((meta.clone(), flag));
            map(vec![("enabled", Value::from(flag))])
        };
        let inner = FnSpec::returning(Value::from("result"));
        let calls = inner.calls();
        let spec = dict_from_bool_spec(dict_maker, inner);

        let meta = Meta::empty().at("search");
        assert_eq!(spec.normalise(&meta, Value::from(false)).unwrap(), Value::from("result"));
        assert_eq!(*made.lock().unwrap(), vec![(meta.clone(), false)]);
        assert_eq!(
            calls.get(),
            vec![(meta, Value::Map(map(vec![("enabled", Value::from(false))])))]
        );
    }

    #[test]
    fn test_dict_from_bool_uses_value_itself_otherwise() {
        let inner = FnSpec::returning(Value::from("result"));
        let calls = inner.calls();
        let spec = dict_from_bool_spec(|_, _| panic!("dict_maker not expected"), inner);
        let val = Value::Map(map(vec![("a", Value::from(1))]));
        assert_eq!(
            spec.normalise(&Meta::empty(), val.clone()).unwrap(),
            Value::from("result")
        );
        assert_eq!(calls.get(), vec![(Meta::empty(), val)]);
    }
}
