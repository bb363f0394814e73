//! Value tree produced by the parser.
//!
//! The tree is:
//!
//! - **Closed**: every syntactic category maps onto one `Value` variant
//! - **Owned**: a `Blok` owns its arguments, nothing is shared between nodes
//! - **Printable**: `Display` renders valid bloks text that parses back to an
//!   equal tree

use std::fmt::{self, Write};

/// A parsed bloks value.
///
/// Numbers carry no integer/float distinction: `1` and `1.0` are the same
/// `Number(1.0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The `null` literal.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// Any numeric literal, widened to `f64`.
    Number(f64),
    /// A quoted string with escapes resolved.
    String(String),
    /// A named node with ordered arguments.
    Blok(Blok),
}

/// A named node: `(name, arg, ...)` or `(#name, arg, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Blok {
    /// Node name. Never empty for parsed input.
    pub name: String,
    /// Arguments in source order.
    pub args: Vec<Value>,
    /// Whether the name was written with a `#` prefix.
    pub is_local: bool,
}

impl Blok {
    /// Create a global blok.
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            is_local: false,
        }
    }

    /// Create a local (`#`-prefixed) blok.
    pub fn local(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            is_local: true,
        }
    }
}

impl Value {
    /// Shorthand for a global `Value::Blok`.
    pub fn blok(name: impl Into<String>, args: Vec<Value>) -> Self {
        Value::Blok(Blok::new(name, args))
    }

    /// Shorthand for a local `Value::Blok`.
    pub fn local_blok(name: impl Into<String>, args: Vec<Value>) -> Self {
        Value::Blok(Blok::local(name, args))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blok(&self) -> Option<&Blok> {
        match self {
            Value::Blok(b) => Some(b),
            _ => None,
        }
    }

    /// Blok name, if this is a blok.
    pub fn name(&self) -> Option<&str> {
        self.as_blok().map(|b| b.name.as_str())
    }

    /// Blok arguments; empty for every other variant.
    pub fn args(&self) -> &[Value] {
        match self {
            Value::Blok(b) => &b.args,
            _ => &[],
        }
    }

    /// Short variant name for summaries and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Blok(_) => "blok",
        }
    }
}

impl From<Blok> for Value {
    fn from(b: Blok) -> Self {
        Value::Blok(b)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
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

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => write_quoted(f, s),
            Value::Blok(b) => write!(f, "{}", b),
        }
    }
}

impl fmt::Display for Blok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        if self.is_local {
            f.write_char('#')?;
        }
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, ", {}", arg)?;
        }
        f.write_char(')')
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    // Overflowing literals such as `1e999` parse to infinity; keep them re-parseable.
    if n.is_nan() {
        f.write_str("null")
    } else if n == f64::INFINITY {
        f.write_str("1e999")
    } else if n == f64::NEG_INFINITY {
        f.write_str("-1e999")
    } else {
        write!(f, "{}", n)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            c if c.is_control() && (c as u32) <= 0xFFFF => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
