//! Decoding text records into typed rows

use super::decimal::{is_integral_literal, Decimal};
use super::temporal::{parse_date, parse_timestamp};
use super::types::{Row, TokenKind, Value};
use crate::config::CodecOptions;
use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Number, Value as JsonValue};
use tracing::warn;

/// Decodes records against a shared, read-only schema
///
/// Holds no parser state between calls; every record is parsed fresh, so one
/// decoder can be shared by reference across threads.
#[derive(Debug, Clone)]
pub struct RowDecoder<'a> {
    schema: &'a Schema,
    corrupt_index: Option<usize>,
    number_format_strict: bool,
    empty_string_as_null: bool,
}

impl<'a> RowDecoder<'a> {
    /// Create a decoder for a schema
    pub fn new(schema: &'a Schema, options: &CodecOptions) -> Self {
        // The corrupt column only counts when the schema declares it as a string
        let corrupt_index = options.corrupt_record_column.as_deref().and_then(|name| {
            schema
                .index_of(name)
                .filter(|&i| schema.fields()[i].data_type.resolve() == &DataType::String)
        });

        Self {
            schema,
            corrupt_index,
            number_format_strict: options.number_format_strict,
            empty_string_as_null: options.empty_string_as_null,
        }
    }

    /// Decode one record into zero or more rows
    ///
    /// A record that fails to parse, or whose root is a scalar, falls back to a
    /// single row carrying the raw text in the corrupt record column (or to no
    /// rows when the schema has no such column). A top-level array yields one
    /// row per object element; a top-level `null` yields no rows.
    pub fn decode_record(&self, text: &str) -> Result<Vec<Row>> {
        let token: JsonValue = match serde_json::from_str(text) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Malformed record, using corrupt record fallback");
                return Ok(self.corrupt_rows(text));
            }
        };

        let fields = self.schema.fields();
        match &token {
            JsonValue::Null => Ok(Vec::new()),
            JsonValue::Object(map) => Ok(vec![self.decode_struct(map, fields)?]),
            JsonValue::Array(items) => {
                if items
                    .iter()
                    .any(|item| !matches!(item, JsonValue::Object(_) | JsonValue::Null))
                {
                    warn!("Top-level array holds non-object elements, using corrupt record fallback");
                    return Ok(self.corrupt_rows(text));
                }
                items
                    .iter()
                    .filter_map(|item| match item {
                        JsonValue::Object(map) => Some(self.decode_struct(map, fields)),
                        _ => None,
                    })
                    .collect()
            }
            _ => {
                warn!(
                    token = %TokenKind::of(&token),
                    "Scalar record root, using corrupt record fallback"
                );
                Ok(self.corrupt_rows(text))
            }
        }
    }

    /// Decode a single parsed value against a type
    pub fn decode_value(&self, token: &JsonValue, data_type: &DataType) -> Result<Value> {
        match (token, data_type) {
            (JsonValue::Null, _) => Ok(Value::Null),
            (JsonValue::String(s), dt)
                if s.is_empty()
                    && self.empty_string_as_null
                    && dt.resolve() != &DataType::String =>
            {
                Ok(Value::Null)
            }
            (_, DataType::User(user)) => self.decode_value(token, &user.sql_type),

            (JsonValue::String(s), DataType::String) => Ok(Value::String(s.clone())),
            // Any other shape is kept as its compact text
            (other, DataType::String) => Ok(Value::String(serde_json::to_string(other)?)),

            (JsonValue::Bool(b), DataType::Boolean) => Ok(Value::Boolean(*b)),

            (JsonValue::Number(n), DataType::Byte) => {
                let v = integral_value(n, data_type)?;
                i8::try_from(v)
                    .map(Value::Byte)
                    .map_err(|_| Error::numeric_literal(v.to_string(), data_type))
            }
            (JsonValue::Number(n), DataType::Short) => {
                let v = integral_value(n, data_type)?;
                i16::try_from(v)
                    .map(Value::Short)
                    .map_err(|_| Error::numeric_literal(v.to_string(), data_type))
            }
            (JsonValue::Number(n), DataType::Integer) => {
                let v = integral_value(n, data_type)?;
                i32::try_from(v)
                    .map(Value::Integer)
                    .map_err(|_| Error::numeric_literal(v.to_string(), data_type))
            }
            (JsonValue::Number(n), DataType::Long) => integral_value(n, data_type).map(Value::Long),

            (JsonValue::Number(n), DataType::Float) => {
                float_value(n, data_type).map(|v| Value::Float(v as f32))
            }
            (JsonValue::Number(n), DataType::Double) => float_value(n, data_type).map(Value::Double),
            (JsonValue::String(s), DataType::Float) => {
                self.special_float(s, data_type).map(|v| Value::Float(v as f32))
            }
            (JsonValue::String(s), DataType::Double) => {
                self.special_float(s, data_type).map(Value::Double)
            }

            (JsonValue::Number(n), DataType::Decimal { precision, scale }) => {
                Decimal::from_literal(&n.to_string(), *precision, *scale).map(Value::Decimal)
            }

            (JsonValue::String(s), DataType::Binary) => Ok(Value::Binary(BASE64.decode(s)?)),

            (JsonValue::String(s), DataType::Date) => parse_date(s).map(Value::Date),
            (JsonValue::Number(n), DataType::Date) => {
                let v = integral_value(n, data_type)?;
                i32::try_from(v)
                    .map(Value::Date)
                    .map_err(|_| Error::numeric_literal(v.to_string(), data_type))
            }

            (JsonValue::String(s), DataType::Timestamp) => parse_timestamp(s).map(Value::Timestamp),
            // Integral timestamps are seconds since the epoch
            (JsonValue::Number(n), DataType::Timestamp) => {
                let seconds = integral_value(n, data_type)?;
                seconds
                    .checked_mul(1_000_000)
                    .map(Value::Timestamp)
                    .ok_or_else(|| Error::numeric_literal(seconds.to_string(), data_type))
            }

            (JsonValue::Object(map), DataType::Struct { fields }) => {
                self.decode_struct(map, fields).map(Value::Struct)
            }
            (JsonValue::Array(items), DataType::Array { element, .. }) => items
                .iter()
                .map(|item| self.decode_value(item, element))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            // A single object where an array was expected becomes a one-element array
            (JsonValue::Object(_), DataType::Array { element, .. }) => {
                Ok(Value::Array(vec![self.decode_value(token, element)?]))
            }
            (JsonValue::Object(map), DataType::Map { value, .. }) => map
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.decode_value(item, value)?)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Map),

            (token, data_type) => Err(Error::decode(TokenKind::of(token), data_type)),
        }
    }

    /// Copy the declared fields out of an object; undeclared keys are discarded
    fn decode_struct(&self, map: &Map<String, JsonValue>, fields: &[Field]) -> Result<Row> {
        fields
            .iter()
            .map(|field| match map.get(&field.name) {
                Some(token) => self.decode_value(token, &field.data_type),
                None => Ok(Value::Null),
            })
            .collect()
    }

    fn corrupt_rows(&self, text: &str) -> Vec<Row> {
        match self.corrupt_index {
            Some(index) => {
                let mut row = Row::nulls(self.schema.len());
                row.set(index, Value::String(text.to_string()));
                vec![row]
            }
            None => Vec::new(),
        }
    }

    fn special_float(&self, text: &str, target: &DataType) -> Result<f64> {
        if !self.number_format_strict {
            match text.to_ascii_lowercase().as_str() {
                "nan" => return Ok(f64::NAN),
                "infinity" | "inf" => return Ok(f64::INFINITY),
                "-infinity" | "-inf" => return Ok(f64::NEG_INFINITY),
                _ => {}
            }
        }
        Err(Error::numeric_literal(text, target))
    }
}

fn integral_value(n: &Number, target: &DataType) -> Result<i64> {
    if let Some(v) = n.as_i64() {
        return Ok(v);
    }
    let literal = n.to_string();
    if is_integral_literal(&literal) {
        Err(Error::numeric_literal(literal, target))
    } else {
        Err(Error::decode(TokenKind::Float, target))
    }
}

/// Out-of-range literals saturate to infinity
fn float_value(n: &Number, target: &DataType) -> Result<f64> {
    if let Some(v) = n.as_f64() {
        return Ok(v);
    }
    let literal = n.to_string();
    literal
        .parse::<f64>()
        .map_err(|_| Error::numeric_literal(literal, target))
}

/// Lazy row sequence produced by [`decode`]
#[derive(Debug)]
pub struct DecodedRows<'a, It> {
    decoder: RowDecoder<'a>,
    records: It,
    pending: std::vec::IntoIter<Row>,
}

impl<It, S> Iterator for DecodedRows<'_, It>
where
    It: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            let record = self.records.next()?;
            match self.decoder.decode_record(record.as_ref()) {
                Ok(rows) => self.pending = rows.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Decode a sequence of records lazily, one item per produced row
///
/// A record that fails to decode yields a single `Err` item; the remaining
/// records are still decoded. Calling again on the same input starts over.
pub fn decode<'a, I, S>(
    records: I,
    schema: &'a Schema,
    options: &CodecOptions,
) -> DecodedRows<'a, I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    DecodedRows {
        decoder: RowDecoder::new(schema, options),
        records: records.into_iter(),
        pending: Vec::new().into_iter(),
    }
}
