//! # Bloks Core
//!
//! Parser for bloks, the compact s-expression payload format used by a
//! mobile-app API layer.
//!
//! ## Quick Start
//!
//! ```rust
//! use bloks_core::{Parser, Value};
//!
//! let parser = Parser::new();
//! let value = parser.parse(r#"(bk.action.test, "hello", 42)"#).unwrap();
//!
//! assert_eq!(value.name(), Some("bk.action.test"));
//! assert_eq!(value.args()[1], Value::Number(42.0));
//! ```
//!
//! ## Processors
//!
//! Processors rewrite bloks while the tree is being built, children first:
//!
//! ```rust
//! use bloks_core::{Parser, Value};
//!
//! let parser = Parser::new().with_basic_processors();
//! let value = parser
//!     .parse("(bk.action.array.Make, (bk.action.i32.Const, 42))")
//!     .unwrap();
//!
//! assert_eq!(value, Value::blok("array", vec![Value::Number(42.0)]));
//! ```
//!
//! ## Exports
//!
//! - [`find_map`] locates the first map node defining a key
//! - [`to_json`] / [`to_json_string`] export a tree as JSON arrays

pub mod error;
pub mod json;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod processor;
pub mod span;
pub mod tree;
pub mod value;

pub use error::{ErrorCategory, ParserError};
pub use json::{to_json, to_json_string};
pub use parser::{parse, Parser, DEFAULT_MAX_DEPTH};
pub use processor::{basic_processors, Processor, ProcessorRegistry, FALLBACK_KEY};
pub use span::Location;
pub use tree::{find_map, TreeStats};
pub use value::{Blok, Value};
