//! Canonicalization of the merged type

use crate::schema::{DataType, Field};

/// Make a merged type schema-safe
///
/// Remaining `Null` leaves become `String`, struct fields with an empty name
/// are dropped, and a struct left without fields is erased (`None`). Erasure
/// propagates through arrays and maps holding the erased type.
pub fn canonicalize(data_type: &DataType) -> Option<DataType> {
    match data_type {
        DataType::Null => Some(DataType::String),
        DataType::Array {
            element,
            contains_null,
        } => canonicalize(element).map(|element| DataType::Array {
            element: Box::new(element),
            contains_null: *contains_null,
        }),
        DataType::Map {
            value,
            value_contains_null,
        } => canonicalize(value).map(|value| DataType::Map {
            value: Box::new(value),
            value_contains_null: *value_contains_null,
        }),
        DataType::Struct { fields } => {
            let fields: Vec<Field> = fields
                .iter()
                .filter(|field| !field.name.is_empty())
                .filter_map(|field| {
                    canonicalize(&field.data_type)
                        .map(|dt| Field::new(field.name.clone(), dt, field.nullable))
                })
                .collect();
            (!fields.is_empty()).then_some(DataType::Struct { fields })
        }
        other => Some(other.clone()),
    }
}
