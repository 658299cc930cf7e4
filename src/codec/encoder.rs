//! Encoding typed rows back into JSON text

use super::temporal::{format_date, format_timestamp};
use super::types::{Row, Value};
use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

/// Encodes rows of one schema into compact JSON objects
#[derive(Debug, Clone, Copy)]
pub struct RowEncoder<'a> {
    schema: &'a Schema,
}

impl<'a> RowEncoder<'a> {
    /// Create an encoder for a schema
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Encode one row; no record separator is appended
    pub fn encode(&self, row: &Row) -> Result<String> {
        let mut emitter = Emitter::default();
        emitter.write_row(row, self.schema.fields())?;
        Ok(emitter.out)
    }
}

/// Encode one row of a schema as a JSON object
pub fn encode(schema: &Schema, row: &Row) -> Result<String> {
    RowEncoder::new(schema).encode(row)
}

/// Encode a standalone value of a declared type
pub fn encode_value(value: &Value, data_type: &DataType) -> Result<String> {
    let mut emitter = Emitter::default();
    emitter.write_value(value, data_type)?;
    Ok(emitter.out)
}

/// Append-only JSON writer, created fresh for every call
#[derive(Debug, Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn write_value(&mut self, value: &Value, data_type: &DataType) -> Result<()> {
        match (value, data_type) {
            (Value::Null, _) => self.out.push_str("null"),
            (_, DataType::User(user)) => self.write_value(value, &user.sql_type)?,

            (Value::String(s), DataType::String) => self.write_json(s)?,
            (Value::Boolean(b), DataType::Boolean) => {
                self.out.push_str(if *b { "true" } else { "false" });
            }
            (Value::Byte(v), DataType::Byte) => self.out.push_str(&v.to_string()),
            (Value::Short(v), DataType::Short) => self.out.push_str(&v.to_string()),
            (Value::Integer(v), DataType::Integer) => self.out.push_str(&v.to_string()),
            (Value::Long(v), DataType::Long) => self.out.push_str(&v.to_string()),
            (Value::Float(v), DataType::Float) => {
                if v.is_finite() {
                    self.write_json(v)?;
                } else {
                    self.write_non_finite(f64::from(*v))?;
                }
            }
            (Value::Double(v), DataType::Double) => {
                if v.is_finite() {
                    self.write_json(v)?;
                } else {
                    self.write_non_finite(*v)?;
                }
            }
            (Value::Decimal(d), DataType::Decimal { .. }) => self.out.push_str(&d.to_string()),
            (Value::Date(days), DataType::Date) => self.write_json(&format_date(*days)?)?,
            (Value::Timestamp(micros), DataType::Timestamp) => {
                self.write_json(&format_timestamp(*micros)?)?;
            }
            (Value::Binary(bytes), DataType::Binary) => self.write_json(&BASE64.encode(bytes))?,

            (Value::Array(items), DataType::Array { element, .. }) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_value(item, element)?;
                }
                self.out.push(']');
            }
            (Value::Map(entries), DataType::Map { value: value_type, .. }) => {
                self.out.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_json(key)?;
                    self.out.push(':');
                    self.write_value(item, value_type)?;
                }
                self.out.push('}');
            }
            (Value::Struct(row), DataType::Struct { fields }) => self.write_row(row, fields)?,

            (value, data_type) => return Err(Error::encode(value.kind(), data_type)),
        }
        Ok(())
    }

    /// Write a row as an object in field order; null fields are omitted
    fn write_row(&mut self, row: &Row, fields: &[Field]) -> Result<()> {
        if row.len() != fields.len() {
            return Err(Error::encode(
                format!("row of {} values", row.len()),
                DataType::structure(fields.to_vec()),
            ));
        }

        self.out.push('{');
        let mut first = true;
        for (field, value) in fields.iter().zip(row.values()) {
            if value.is_null() {
                continue;
            }
            if !first {
                self.out.push(',');
            }
            first = false;
            self.write_json(&field.name)?;
            self.out.push(':');
            self.write_value(value, &field.data_type)?;
        }
        self.out.push('}');
        Ok(())
    }

    fn write_non_finite(&mut self, v: f64) -> Result<()> {
        let text = if v.is_nan() {
            "NaN"
        } else if v.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        self.write_json(text)
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.out.push_str(&serde_json::to_string(value)?);
        Ok(())
    }
}
