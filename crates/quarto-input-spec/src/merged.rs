//! Layered option mappings.
//!
//! `MergedOptions` holds an ordered stack of mappings (first = lowest
//! priority, last = highest) and resolves them into a single flat mapping
//! on demand. Specs that accept a dictionary accept a `MergedOptions`
//! anywhere a plain mapping is accepted; they only ever see the flattened
//! snapshot.
//!
//! # Merge semantics
//!
//! - On a key collision the later layer wins.
//! - When both colliding values are mappings they are merged recursively
//!   with the same rule.
//! - A key keeps the position where it was first seen.
//!
//! # Example
//!
//! ```rust
//! use quarto_input_spec::{Mapping, MergedOptions, Value};
//!
//! let mut project = Mapping::new();
//! project.insert("theme".into(), Value::from("cosmo"));
//! project.insert("toc".into(), Value::from(false));
//!
//! let mut document = Mapping::new();
//! document.insert("toc".into(), Value::from(true));
//!
//! let merged = MergedOptions::using(vec![project, document]);
//! assert_eq!(merged.get("toc"), Some(Value::from(true)));
//! assert_eq!(merged.keys(), vec!["theme".to_string(), "toc".to_string()]);
//! ```

use crate::value::{Mapping, Value};

/// An ordered stack of option layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedOptions {
    /// Ordered list of layers (first = lowest priority, last = highest)
    layers: Vec<Mapping>,
}

impl MergedOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Create options from layers, lowest priority first.
    pub fn using(layers: impl IntoIterator<Item = Mapping>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// Push a new highest-priority layer.
    pub fn update(&mut self, layer: Mapping) {
        self.layers.push(layer);
    }

    /// Add a new layer (returns new MergedOptions, doesn't mutate).
    pub fn with_layer(&self, layer: Mapping) -> MergedOptions {
        let mut layers = self.layers.clone();
        layers.push(layer);
        MergedOptions { layers }
    }

    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Mapping::is_empty)
    }

    /// Resolve a single top-level key.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut resolved: Option<Value> = None;
        for layer in &self.layers {
            if let Some(value) = layer.get(key) {
                resolved = Some(match resolved {
                    Some(existing) => merge_values(existing, value),
                    None => flatten_value(value),
                });
            }
        }
        resolved
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains_key(key))
    }

    /// Keys across all layers, in the order they were first seen.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for layer in &self.layers {
            for key in layer.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// Flatten all layers into one mapping.
    pub fn as_dict(&self) -> Mapping {
        let mut result = Mapping::new();
        for layer in &self.layers {
            merge_into(&mut result, layer);
        }
        result
    }
}

fn merge_into(target: &mut Mapping, layer: &Mapping) {
    for (key, value) in layer {
        match target.get_mut(key) {
            Some(existing) => {
                let current = std::mem::take(existing);
                *existing = merge_values(current, value);
            }
            None => {
                target.insert(key.clone(), flatten_value(value));
            }
        }
    }
}

/// Combine an already-resolved value with a higher-priority one.
fn merge_values(existing: Value, incoming: &Value) -> Value {
    match (existing, incoming.as_mapping()) {
        (Value::Map(mut base), Some(overlay)) => {
            merge_into(&mut base, &overlay);
            Value::Map(base)
        }
        _ => flatten_value(incoming),
    }
}

/// Nested merged options resolve to plain mappings.
fn flatten_value(value: &Value) -> Value {
    match value {
        Value::Merged(merged) => Value::Map(merged.as_dict()),
        other => other.clone(),
    }
}
