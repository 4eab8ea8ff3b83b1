//! Untyped row capture for the summary view.
//!
//! The view's column layout is opaque to this crate, so each row is captured
//! as a sequence of JSON values by classifying the column's database type
//! name, and printed verbatim as a tuple-style line.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use std::fmt;

/// One row of the summary view, column layout unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Fila(Vec<Value>);

impl Fila {
    pub fn new(valores: Vec<Value>) -> Self {
        Self(valores)
    }

    /// Capture a database row, best effort: a column whose type cannot be
    /// decoded becomes a `<type>` placeholder instead of failing the report.
    pub fn from_row(row: &PgRow) -> Self {
        let valores = row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| decode_value(row, idx, col.type_info().name()))
            .collect();
        Self(valores)
    }

    pub fn valores(&self) -> &[Value] {
        &self.0
    }
}

impl fmt::Display for Fila {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, valor) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{valor}")?;
        }
        write!(f, ")")
    }
}

/// Decode one column into a JSON value based on its database type name.
/// Postgres type-info names are exact (INT4, FLOAT8, ...), not SQL aliases.
fn decode_value(row: &PgRow, idx: usize, type_name: &str) -> Value {
    match type_name {
        "INT2" => match row.try_get::<Option<i16>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, Value::from),
            Err(_) => placeholder(type_name),
        },
        "INT4" => match row.try_get::<Option<i32>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, Value::from),
            Err(_) => placeholder(type_name),
        },
        "INT8" => match row.try_get::<Option<i64>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, Value::from),
            Err(_) => placeholder(type_name),
        },
        // f64 only decodes FLOAT8; REAL columns must come out as f32 and widen.
        "FLOAT4" => match row.try_get::<Option<f32>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, |v| json_float(f64::from(v))),
            Err(_) => placeholder(type_name),
        },
        "FLOAT8" => match row.try_get::<Option<f64>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, json_float),
            Err(_) => placeholder(type_name),
        },
        // Preserve the exact database representation of decimals.
        "NUMERIC" => match row.try_get::<Option<BigDecimal>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, |d| Value::String(d.to_string())),
            Err(_) => placeholder(type_name),
        },
        "BOOL" => match row.try_get::<Option<bool>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, Value::from),
            Err(_) => placeholder(type_name),
        },
        "TIMESTAMPTZ" => match row.try_get::<Option<DateTime<Utc>>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, |t| Value::String(t.to_rfc3339())),
            Err(_) => placeholder(type_name),
        },
        "TIMESTAMP" => match row.try_get::<Option<NaiveDateTime>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, |t| Value::String(t.to_string())),
            Err(_) => placeholder(type_name),
        },
        "DATE" => match row.try_get::<Option<NaiveDate>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, |d| Value::String(d.to_string())),
            Err(_) => placeholder(type_name),
        },
        // Everything else is treated as text (varchar, char, name, ...).
        _ => match row.try_get::<Option<String>, _>(idx) {
            Ok(v) => v.map_or(Value::Null, Value::String),
            Err(_) => placeholder(type_name),
        },
    }
}

/// JSON has no NaN/infinity; those render as null.
fn json_float(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

fn placeholder(type_name: &str) -> Value {
    Value::String(format!("<{type_name}>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fila_display_tuple_style() {
        let fila = Fila::new(vec![json!(42), json!("ENTREGADO"), json!("2500.00")]);
        assert_eq!(fila.to_string(), r#"(42, "ENTREGADO", "2500.00")"#);
    }

    #[test]
    fn test_fila_display_single_value() {
        let fila = Fila::new(vec![json!(7)]);
        assert_eq!(fila.to_string(), "(7)");
    }

    #[test]
    fn test_fila_display_empty() {
        let fila = Fila::new(Vec::new());
        assert_eq!(fila.to_string(), "()");
    }

    #[test]
    fn test_fila_display_null() {
        let fila = Fila::new(vec![json!(1), Value::Null]);
        assert_eq!(fila.to_string(), "(1, null)");
    }

    #[test]
    fn test_json_float_finite() {
        assert_eq!(json_float(12.5), json!(12.5));
    }

    #[test]
    fn test_json_float_widened_from_f32() {
        // The path a REAL column takes: decode as f32, widen, convert.
        let v = 7.25_f32;
        assert_eq!(json_float(f64::from(v)), json!(7.25));
    }

    #[test]
    fn test_json_float_non_finite_is_null() {
        assert_eq!(json_float(f64::NAN), Value::Null);
        assert_eq!(json_float(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_valores_accessor() {
        let fila = Fila::new(vec![json!(1), json!(true)]);
        assert_eq!(fila.valores().len(), 2);
        assert_eq!(fila.valores()[1], json!(true));
    }
}
