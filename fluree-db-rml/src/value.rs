//! Raw field values and their canonical string forms
//!
//! Iteration contexts hand out [`RawValue`]s as read from the source
//! (a CSV cell, a JSON node, a relational column value). Term generation
//! only ever needs the canonical string form, produced by
//! [`RawValue::canonical_string`].

use serde::{Deserialize, Serialize};

/// Raw typed value of a record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// SQL NULL, JSON null, missing cell
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    /// Decimal as (unscaled_value, scale)
    Decimal { unscaled: i128, scale: i8 },
    String(String),
    Bytes(Vec<u8>),
    /// Hierarchical sub-tree (JSON sources)
    Json(serde_json::Value),
}

impl RawValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null | RawValue::Json(serde_json::Value::Null))
    }

    /// Short type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Boolean(_) => "boolean",
            RawValue::Integer(_) => "integer",
            RawValue::Double(_) => "double",
            RawValue::Decimal { .. } => "decimal",
            RawValue::String(_) => "string",
            RawValue::Bytes(_) => "bytes",
            RawValue::Json(serde_json::Value::Array(_)) => "array",
            RawValue::Json(serde_json::Value::Object(_)) => "object",
            RawValue::Json(_) => "json",
        }
    }

    /// Render the canonical string form of this value
    ///
    /// Returns `Ok(None)` for null values and `Err` with a description for
    /// values that have no string form (structured JSON sub-trees).
    pub fn canonical_string(&self) -> Result<Option<String>, String> {
        match self {
            RawValue::Null => Ok(None),
            RawValue::Boolean(b) => Ok(Some(b.to_string())),
            RawValue::Integer(n) => Ok(Some(n.to_string())),
            RawValue::Double(d) => Ok(Some(format_double(*d))),
            RawValue::Decimal { unscaled, scale } => Ok(Some(format_decimal(*unscaled, *scale))),
            RawValue::String(s) => Ok(Some(s.clone())),
            RawValue::Bytes(b) => Ok(Some(hex_encode(b))),
            RawValue::Json(json) => match json {
                serde_json::Value::Null => Ok(None),
                serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
                serde_json::Value::Number(n) => Ok(Some(n.to_string())),
                serde_json::Value::String(s) => Ok(Some(s.clone())),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(format!(
                    "{} value has no canonical string form",
                    self.type_name()
                )),
            },
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Boolean(b)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Integer(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Integer(n.into())
    }
}

impl From<f64> for RawValue {
    fn from(d: f64) -> Self {
        RawValue::Double(d)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(json: serde_json::Value) -> Self {
        RawValue::Json(json)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d == f64::INFINITY {
        "INF".to_string()
    } else if d == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        d.to_string()
    }
}

/// Format decimal with scale
///
/// Works on the digit string so that no scale can overflow.
fn format_decimal(unscaled: i128, scale: i8) -> String {
    let sign = if unscaled < 0 { "-" } else { "" };
    let digits = unscaled.unsigned_abs().to_string();

    if scale <= 0 {
        if unscaled == 0 {
            return digits;
        }
        let zeros = usize::from(scale.unsigned_abs());
        return format!("{}{}{}", sign, digits, "0".repeat(zeros));
    }

    let scale = usize::from(scale.unsigned_abs());
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (integer_part, fractional_part) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, integer_part, fractional_part)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
