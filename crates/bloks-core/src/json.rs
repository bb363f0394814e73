//! JSON export.
//!
//! Bloks become arrays headed by their name: `(a, 1.5, "x")` exports as
//! `["a", 1.5, "x"]`. The local flag has no JSON counterpart and is dropped,
//! so `(a)` and `(#a)` export identically.

use serde_json::{Number, Value as Json};

use crate::error::ParserError;
use crate::value::Value;

/// Convert a value to a generic JSON structure.
///
/// Whole numbers within `i64` range export as JSON integers, so `(a, 42)`
/// becomes `["a", 42]`. Non-finite numbers have no JSON representation and
/// fail with [`ParserError::Internal`].
pub fn to_json(value: &Value) -> Result<Json, ParserError> {
    let json = match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => Json::Number(json_number(*n)?),
        Value::String(s) => Json::String(s.clone()),
        Value::Blok(blok) => {
            let mut items = Vec::with_capacity(blok.args.len() + 1);
            items.push(Json::String(blok.name.clone()));
            for arg in &blok.args {
                items.push(to_json(arg)?);
            }
            Json::Array(items)
        }
    };
    Ok(json)
}

/// Serialize a value to JSON text.
///
/// `pretty` selects two-space indented output.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String, ParserError> {
    let json = to_json(value)?;
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

fn json_number(n: f64) -> Result<Number, ParserError> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Ok(Number::from(n as i64));
    }
    Number::from_f64(n)
        .ok_or_else(|| ParserError::internal(format!("non-finite number {} has no JSON form", n)))
}
