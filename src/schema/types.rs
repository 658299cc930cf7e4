//! Schema types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Largest precision a decimal type can carry
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Structural type of a value position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataType {
    Null,
    String,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Decimal {
        precision: u8,
        scale: u8,
    },
    Date,
    Timestamp,
    Binary,
    Array {
        element: Box<DataType>,
        contains_null: bool,
    },
    /// Fields are unique by name and, once inferred, sorted by name
    Struct {
        fields: Vec<Field>,
    },
    /// Keys are always strings
    Map {
        value: Box<DataType>,
        value_contains_null: bool,
    },
    User(UserType),
}

impl DataType {
    /// Create an array type whose elements may be null
    pub fn array(element: DataType) -> Self {
        DataType::Array {
            element: Box::new(element),
            contains_null: true,
        }
    }

    /// Create a string-keyed map type whose values may be null
    pub fn map(value: DataType) -> Self {
        DataType::Map {
            value: Box::new(value),
            value_contains_null: true,
        }
    }

    /// Create a decimal type
    pub fn decimal(precision: u8, scale: u8) -> Self {
        DataType::Decimal { precision, scale }
    }

    /// Create a struct type from fields
    pub fn structure(fields: Vec<Field>) -> Self {
        DataType::Struct { fields }
    }

    /// Follow semantic aliases down to the structural type
    pub fn resolve(&self) -> &DataType {
        match self {
            DataType::User(user) => user.sql_type.resolve(),
            other => other,
        }
    }

    /// Check if this is one of the integral types
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            DataType::Byte | DataType::Short | DataType::Integer | DataType::Long
        )
    }

    /// Check if this is an integral or binary floating point type
    pub fn is_primitive_numeric(&self) -> bool {
        self.is_integral() || matches!(self, DataType::Float | DataType::Double)
    }

    /// Widening rank among integral types
    pub(crate) fn integral_rank(&self) -> Option<u8> {
        match self {
            DataType::Byte => Some(0),
            DataType::Short => Some(1),
            DataType::Integer => Some(2),
            DataType::Long => Some(3),
            _ => None,
        }
    }

    /// Decimal digits needed to hold every value of an integral type
    pub(crate) fn integral_digits(&self) -> Option<u8> {
        match self {
            DataType::Byte => Some(3),
            DataType::Short => Some(5),
            DataType::Integer => Some(10),
            DataType::Long => Some(20),
            _ => None,
        }
    }

    /// Get the fields of a struct type
    pub fn fields(&self) -> Option<&[Field]> {
        match self.resolve() {
            DataType::Struct { fields } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "null"),
            DataType::String => write!(f, "string"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Byte => write!(f, "byte"),
            DataType::Short => write!(f, "short"),
            DataType::Integer => write!(f, "integer"),
            DataType::Long => write!(f, "long"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            DataType::Date => write!(f, "date"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Binary => write!(f, "binary"),
            DataType::Array { element, .. } => write!(f, "array<{element}>"),
            DataType::Struct { fields } => {
                write!(f, "struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", field.name, field.data_type)?;
                }
                write!(f, ">")
            }
            DataType::Map { value, .. } => write!(f, "map<string,{value}>"),
            DataType::User(user) => write!(f, "{}", user.name),
        }
    }
}

/// Named alias backed by a structural type (e.g. a vector stored as `array<double>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserType {
    /// Alias name shown in error messages
    pub name: String,
    /// Structural type the alias is stored as
    pub sql_type: Box<DataType>,
}

impl UserType {
    /// Create a new semantic alias
    pub fn new(name: impl Into<String>, sql_type: DataType) -> Self {
        Self {
            name: name.into(),
            sql_type: Box::new(sql_type),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Column type
    pub data_type: DataType,
    /// Whether the column may hold nulls
    #[serde(default = "default_true")]
    pub nullable: bool,
}

fn default_true() -> bool {
    true
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Create a nullable field
    pub fn nullable(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, true)
    }
}

/// Ordered, duplicate-free sequence of fields
///
/// Built once per inference pass and shared read-only by every decode and
/// encode call for the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    fields: Vec<Field>,
}

#[derive(Deserialize)]
struct RawSchema {
    #[serde(default)]
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema, rejecting duplicate field names at any nesting level
    pub fn try_new(fields: Vec<Field>) -> Result<Self> {
        Self::try_new_with_case(fields, true)
    }

    /// Create a schema, optionally treating names that differ only in case as duplicates
    pub fn try_new_with_case(fields: Vec<Field>, case_sensitive: bool) -> Result<Self> {
        check_unique(&fields, case_sensitive)?;
        Ok(Self { fields })
    }

    /// Create a schema from a struct type; any other type yields the empty schema
    pub fn from_type(data_type: DataType, case_sensitive: bool) -> Result<Self> {
        match data_type {
            DataType::Struct { fields } => Self::try_new_with_case(fields, case_sensitive),
            _ => Ok(Self::empty()),
        }
    }

    /// Create a schema with no fields
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// Get the fields in order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// View the schema as a struct type
    pub fn to_struct_type(&self) -> DataType {
        DataType::Struct {
            fields: self.fields.clone(),
        }
    }

    /// Parse a schema previously written by [`Schema::to_json`]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawSchema = serde_json::from_str(json)?;
        Self::try_new(raw.fields)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_struct_type())
    }
}

fn check_unique(fields: &[Field], case_sensitive: bool) -> Result<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        let key = if case_sensitive {
            field.name.clone()
        } else {
            field.name.to_lowercase()
        };
        if !seen.insert(key) {
            return Err(Error::duplicate_field(&field.name));
        }
        check_nested(&field.data_type, case_sensitive)?;
    }
    Ok(())
}

fn check_nested(data_type: &DataType, case_sensitive: bool) -> Result<()> {
    match data_type {
        DataType::Struct { fields } => check_unique(fields, case_sensitive),
        DataType::Array { element, .. } => check_nested(element, case_sensitive),
        DataType::Map { value, .. } => check_nested(value, case_sensitive),
        DataType::User(user) => check_nested(&user.sql_type, case_sensitive),
        _ => Ok(()),
    }
}
