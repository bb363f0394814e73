//! Pluggable post-processing of parsed bloks.
//!
//! Every blok is handed to the registry right after its closing paren is
//! consumed. Lookup order:
//!
//! 1. a processor registered under the exact blok name
//! 2. the processor registered under [`FALLBACK_KEY`] (`"@"`)
//! 3. the registry's fallback, which defaults to [`identity`]
//!
//! Because nested bloks close first, processors always see arguments that
//! have already been processed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::value::{Blok, Value};

/// Reserved registry key used when no exact-name processor exists.
pub const FALLBACK_KEY: &str = "@";

/// Raw name of the array-construction node.
pub const ARRAY_MAKE: &str = "bk.action.array.Make";
/// Raw name of the map-construction node.
pub const MAP_MAKE: &str = "bk.action.map.Make";
/// Raw name of the boolean-constant node.
pub const BOOL_CONST: &str = "bk.action.bool.Const";
/// Raw names of the numeric-constant nodes.
pub const NUMBER_CONSTS: [&str; 4] = [
    "bk.action.i32.Const",
    "bk.action.i64.Const",
    "bk.action.f32.Const",
    "bk.action.f64.Const",
];

/// Name given to processed array-construction nodes.
pub const ARRAY: &str = "array";
/// Name given to processed map-construction nodes.
pub const MAP: &str = "map";

/// A transform applied to a fully parsed blok.
///
/// The blok carries its name, processed arguments and locality flag. The
/// returned value replaces it in the tree and may be of any variant.
pub type Processor = Arc<dyn Fn(Blok) -> Value + Send + Sync>;

/// Wrap a closure as a [`Processor`].
pub fn processor<F>(f: F) -> Processor
where
    F: Fn(Blok) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The default processor: re-wraps the blok unchanged.
pub fn identity() -> Processor {
    processor(Value::Blok)
}

/// Name-keyed processor table with a fallback.
#[derive(Clone)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Processor>,
    fallback: Processor,
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorRegistry {
    /// Create an empty registry with the identity fallback.
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
            fallback: identity(),
        }
    }

    /// Register `f` for bloks named exactly `name`, replacing any previous
    /// entry. Registering under [`FALLBACK_KEY`] overrides the fallback.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Blok) -> Value + Send + Sync + 'static,
    {
        self.processors.insert(name.into(), processor(f));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Blok) -> Value + Send + Sync + 'static,
    {
        self.register(name, f);
        self
    }

    /// Replace the constructor-level fallback.
    pub fn with_fallback<F>(mut self, f: F) -> Self
    where
        F: Fn(Blok) -> Value + Send + Sync + 'static,
    {
        self.fallback = processor(f);
        self
    }

    /// Add every entry of `other`, overwriting on name clashes. The fallback
    /// of `self` is kept.
    pub fn extend(&mut self, other: ProcessorRegistry) {
        self.processors.extend(other.processors);
    }

    /// Whether a processor is registered under exactly `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Pick the processor for `name`.
    pub fn resolve(&self, name: &str) -> &Processor {
        self.processors
            .get(name)
            .or_else(|| self.processors.get(FALLBACK_KEY))
            .unwrap_or(&self.fallback)
    }

    /// Run the matching processor on `blok`.
    pub fn apply(&self, blok: Blok) -> Value {
        trace!(
            name = %blok.name,
            args = blok.args.len(),
            local = blok.is_local,
            registered = self.contains(&blok.name),
            "processing blok"
        );
        let f = self.resolve(&blok.name);
        f(blok)
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.processors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ProcessorRegistry")
            .field("processors", &names)
            .finish_non_exhaustive()
    }
}

/// Registry with the reference processors for common bk.action nodes.
///
/// - `bk.action.array.Make` is renamed to [`ARRAY`]
/// - `bk.action.map.Make` is renamed to [`MAP`]
/// - numeric constants unwrap to their first argument
/// - `bk.action.bool.Const` coerces its first argument with [`truthy`]
pub fn basic_processors() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new()
        .with(ARRAY_MAKE, |blok| relabel(blok, ARRAY))
        .with(MAP_MAKE, |blok| relabel(blok, MAP))
        .with(BOOL_CONST, |blok| {
            Value::Bool(truthy(blok.args.first()))
        });
    for name in NUMBER_CONSTS {
        registry.register(name, unwrap_first);
    }
    registry
}

fn relabel(blok: Blok, name: &str) -> Value {
    Value::Blok(Blok {
        name: name.to_string(),
        ..blok
    })
}

/// First argument as-is, or `Null` when there are none.
fn unwrap_first(blok: Blok) -> Value {
    blok.args.into_iter().next().unwrap_or(Value::Null)
}

/// Boolean coercion used by `bk.action.bool.Const`.
///
/// Strings are true unless empty, `"false"` or `"0"`. Numbers are true
/// unless zero. Any other present value is true; an absent one is false.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => *n != 0.0,
        Some(Value::String(s)) => !(s.is_empty() || s == "false" || s == "0"),
        Some(Value::Null | Value::Blok(_)) => true,
    }
}
