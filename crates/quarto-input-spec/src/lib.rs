//! Declarative normalisation of loosely-typed configuration values.
//!
//! Configuration arrives as YAML or JSON, sometimes layered from several
//! files. This crate turns it into validated, normalised values by running it
//! through a tree of composable specs, reporting every problem it finds
//! rather than stopping at the first one.
//!
//! # Key Features
//!
//! - **Absence is explicit**: [`Value::NotSpecified`] is distinct from null,
//!   `""`, and `{}`, so specs can supply defaults only where nothing was given
//! - **Position tracking**: every error carries the [`Meta`] position of the
//!   value that failed (`_quarto.yml at format.html[0]`)
//! - **Error aggregation**: composite specs visit every child and raise one
//!   error holding all child failures, preserving the tree structure
//! - **Layered input**: [`MergedOptions`] is accepted anywhere a mapping is
//!
//! # Architecture
//!
//! - [`Value`]: raw and normalised values, including constructed objects
//! - [`Spec`]: the normalisation protocol; concrete specs live in [`spec`]
//! - [`SpecError`]: a failure, possibly holding nested failures
//!
//! # Example
//!
//! ```rust
//! use quarto_input_spec::spec::{boolean, integer_spec, set_options, string_spec};
//! use quarto_input_spec::{Meta, Spec, Value};
//! use yaml_rust2::YamlLoader;
//!
//! let docs = YamlLoader::load_from_str("title: Notes\ntoc: true\n").unwrap();
//! let spec = set_options()
//!     .with_option("title", string_spec())
//!     .with_option("toc", boolean())
//!     .with_option("toc-depth", integer_spec());
//!
//! let meta = Meta::new("_quarto.yml");
//! let normalised = spec.normalise(&meta, Value::from(&docs[0])).unwrap();
//! let options = normalised.as_mapping().unwrap();
//! assert_eq!(options["toc"], Value::from(true));
//! // known options that weren't supplied stay absent
//! assert!(!options.contains_key("toc-depth"));
//! ```

mod error;
mod fs;
mod merged;
mod meta;
pub mod spec;
mod value;

pub use error::{Got, SpecError, SpecErrorKind, SpecResult};

pub use fs::{FileSystem, NativeFileSystem, PathKind};

pub use merged::MergedOptions;

pub use meta::{Meta, PathSegment, Position};

pub use spec::{BoxedSpec, Spec};

pub use value::{Instance, Mapping, ToJsonError, Value, ValueType};
