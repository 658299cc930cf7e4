//! Type lattice: least upper bound of two observed types

use super::types::{DataType, Field, MAX_DECIMAL_PRECISION};
use std::collections::BTreeMap;

/// Merge two types observed at the same position into the most general common type
///
/// The operator is commutative, idempotent and associative, so an unordered
/// multiset of types folds to the same result in any order. `Null` is the
/// bottom element; `String` absorbs every mismatch since any value can be
/// rendered as text.
pub fn most_general(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::User(user), other) | (other, DataType::User(user)) => {
            most_general(&user.sql_type, other)
        }

        (l, r) if l.is_integral() && r.is_integral() => {
            if l.integral_rank() >= r.integral_rank() {
                l.clone()
            } else {
                r.clone()
            }
        }
        // Float vs Double, or integral vs Float/Double
        (l, r) if l.is_primitive_numeric() && r.is_primitive_numeric() => DataType::Double,

        (DataType::Decimal { .. }, DataType::Float | DataType::Double)
        | (DataType::Float | DataType::Double, DataType::Decimal { .. }) => DataType::Double,
        (
            DataType::Decimal {
                precision: p1,
                scale: s1,
            },
            DataType::Decimal {
                precision: p2,
                scale: s2,
            },
        ) => merge_decimals(*p1, *s1, *p2, *s2),
        (DataType::Decimal { precision, scale }, integral)
        | (integral, DataType::Decimal { precision, scale })
            if integral.is_integral() =>
        {
            let digits = integral.integral_digits().unwrap_or(MAX_DECIMAL_PRECISION);
            merge_decimals(*precision, *scale, digits, 0)
        }

        (DataType::Date, DataType::Timestamp) | (DataType::Timestamp, DataType::Date) => {
            DataType::Timestamp
        }

        (DataType::Struct { fields: left }, DataType::Struct { fields: right }) => {
            DataType::Struct {
                fields: merge_fields(left, right),
            }
        }
        (
            DataType::Array {
                element: e1,
                contains_null: n1,
            },
            DataType::Array {
                element: e2,
                contains_null: n2,
            },
        ) => DataType::Array {
            element: Box::new(most_general(e1, e2)),
            contains_null: *n1 || *n2,
        },
        (
            DataType::Map {
                value: v1,
                value_contains_null: n1,
            },
            DataType::Map {
                value: v2,
                value_contains_null: n2,
            },
        ) => DataType::Map {
            value: Box::new(most_general(v1, v2)),
            value_contains_null: *n1 || *n2,
        },

        _ => DataType::String,
    }
}

/// Fold any number of types through [`most_general`], starting from `Null`
pub fn merge_all<I>(types: I) -> DataType
where
    I: IntoIterator<Item = DataType>,
{
    types
        .into_iter()
        .fold(DataType::Null, |acc, t| most_general(&acc, &t))
}

impl DataType {
    /// Merge two types, returning the more general type
    pub fn merge_with(&self, other: &DataType) -> DataType {
        most_general(self, other)
    }
}

fn merge_decimals(p1: u8, s1: u8, p2: u8, s2: u8) -> DataType {
    let scale = s1.max(s2);
    let range = p1.saturating_sub(s1).max(p2.saturating_sub(s2));
    let precision = u16::from(range) + u16::from(scale);
    if precision > u16::from(MAX_DECIMAL_PRECISION) {
        DataType::Double
    } else {
        DataType::Decimal {
            precision: precision as u8,
            scale,
        }
    }
}

/// Union of two field lists; shared names merge recursively, output is sorted and nullable
fn merge_fields(left: &[Field], right: &[Field]) -> Vec<Field> {
    let mut merged: BTreeMap<&str, DataType> = BTreeMap::new();
    for field in left {
        merged.insert(field.name.as_str(), field.data_type.clone());
    }
    for field in right {
        merged
            .entry(field.name.as_str())
            .and_modify(|existing| *existing = most_general(existing, &field.data_type))
            .or_insert_with(|| field.data_type.clone());
    }

    merged
        .into_iter()
        .map(|(name, data_type)| Field::nullable(name, data_type))
        .collect()
}
