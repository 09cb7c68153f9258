//! Test doubles for specs.

use super::Spec;
use crate::error::SpecResult;
use crate::meta::Meta;
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Shared log of the `(position, value)` pairs a spec was called with.
#[derive(Debug, Clone, Default)]
pub(crate) struct Calls(Arc<Mutex<Vec<(Meta, Value)>>>);

impl Calls {
    pub(crate) fn get(&self) -> Vec<(Meta, Value)> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

type Handler = Box<dyn Fn(&Meta, Value) -> SpecResult<Value> + Send + Sync>;

/// A spec whose whole `normalise` is a closure, recording every call.
pub(crate) struct FnSpec {
    calls: Calls,
    handler: Handler,
}

impl FnSpec {
    pub(crate) fn new(
        handler: impl Fn(&Meta, Value) -> SpecResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Calls::default(),
            handler: Box::new(handler),
        }
    }

    pub(crate) fn returning(result: Value) -> Self {
        Self::new(move |_, _| Ok(result.clone()))
    }

    pub(crate) fn failing(error: crate::error::SpecError) -> Self {
        Self::new(move |_, _| Err(error.clone()))
    }

    pub(crate) fn calls(&self) -> Calls {
        self.calls.clone()
    }
}

impl fmt::Debug for FnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSpec").finish_non_exhaustive()
    }
}

impl Spec for FnSpec {
    fn normalise(&self, meta: &Meta, val: Value) -> SpecResult<Value> {
        self.calls.0.lock().unwrap().push((meta.clone(), val.clone()));
        (self.handler)(meta, val)
    }
}
