//! Row value types and token kinds

use super::decimal::Decimal;
use serde_json::Value as JsonValue;
use std::fmt;

/// A typed value at one position of a row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Binary(Vec<u8>),
    /// Days since 1970-01-01
    Date(i32),
    /// Microseconds since 1970-01-01T00:00:00Z
    Timestamp(i64),
    Array(Vec<Value>),
    /// Entries in input order
    Map(Vec<(String, Value)>),
    Struct(Row),
}

impl Value {
    /// Check if this is the null placeholder
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the runtime kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Integer(_) => "integer",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
        }
    }

    /// Get the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the long payload
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the nested row payload
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Value::Struct(row) => Some(row),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Row> for Value {
    fn from(v: Row) -> Self {
        Value::Struct(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Values positionally aligned with the fields of a schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create a row of `len` nulls
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![Value::Null; len],
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value at a position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replace the value at a position; out-of-range positions are ignored
    pub fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// All values in order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Take ownership of the values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Lexical kind of the current token in a parsed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StartObject,
    StartArray,
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

impl TokenKind {
    /// Classify a parsed JSON node
    pub fn of(token: &JsonValue) -> Self {
        match token {
            JsonValue::Object(_) => TokenKind::StartObject,
            JsonValue::Array(_) => TokenKind::StartArray,
            JsonValue::String(_) => TokenKind::String,
            JsonValue::Number(n) => {
                if n.is_i64() || n.is_u64() || super::decimal::is_integral_literal(&n.to_string())
                {
                    TokenKind::Integer
                } else {
                    TokenKind::Float
                }
            }
            JsonValue::Bool(_) => TokenKind::Boolean,
            JsonValue::Null => TokenKind::Null,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::StartObject => write!(f, "object"),
            TokenKind::StartArray => write!(f, "array"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Integer => write!(f, "integer"),
            TokenKind::Float => write!(f, "float"),
            TokenKind::Boolean => write!(f, "boolean"),
            TokenKind::Null => write!(f, "null"),
        }
    }
}
