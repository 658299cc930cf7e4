//! Schema and lattice tests

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;

fn strukt(fields: &[(&str, DataType)]) -> DataType {
    DataType::structure(
        fields
            .iter()
            .map(|(name, dt)| Field::nullable(*name, dt.clone()))
            .collect(),
    )
}

#[test]
fn test_same_type_merge() {
    assert_eq!(
        most_general(&DataType::String, &DataType::String),
        DataType::String
    );
    assert_eq!(
        most_general(&DataType::Long, &DataType::Long),
        DataType::Long
    );
}

#[test]
fn test_null_is_bottom() {
    for t in [
        DataType::String,
        DataType::Long,
        DataType::decimal(10, 2),
        DataType::array(DataType::Boolean),
        strukt(&[("a", DataType::Long)]),
    ] {
        assert_eq!(most_general(&DataType::Null, &t), t);
        assert_eq!(most_general(&t, &DataType::Null), t);
    }
}

#[test]
fn test_integral_widening() {
    assert_eq!(
        most_general(&DataType::Byte, &DataType::Short),
        DataType::Short
    );
    assert_eq!(
        most_general(&DataType::Integer, &DataType::Short),
        DataType::Integer
    );
    assert_eq!(
        most_general(&DataType::Long, &DataType::Byte),
        DataType::Long
    );
}

#[test]
fn test_integral_and_fractional_widen_to_double() {
    assert_eq!(
        most_general(&DataType::Long, &DataType::Double),
        DataType::Double
    );
    assert_eq!(
        most_general(&DataType::Integer, &DataType::Float),
        DataType::Double
    );
    assert_eq!(
        most_general(&DataType::Float, &DataType::Double),
        DataType::Double
    );
}

#[test]
fn test_decimal_merge() {
    assert_eq!(
        most_general(&DataType::decimal(10, 2), &DataType::decimal(5, 4)),
        DataType::decimal(12, 4)
    );
    // range 20, scale 15: still fits
    assert_eq!(
        most_general(&DataType::decimal(30, 10), &DataType::decimal(20, 15)),
        DataType::decimal(35, 15)
    );
}

#[test]
fn test_decimal_overflow_falls_back_to_double() {
    // range 28 + scale 15 = 43 > 38
    assert_eq!(
        most_general(&DataType::decimal(38, 10), &DataType::decimal(20, 15)),
        DataType::Double
    );
}

#[test]
fn test_integral_and_decimal() {
    assert_eq!(
        most_general(&DataType::Integer, &DataType::decimal(5, 2)),
        DataType::decimal(12, 2)
    );
    assert_eq!(
        most_general(&DataType::decimal(30, 0), &DataType::Long),
        DataType::decimal(30, 0)
    );
    assert_eq!(
        most_general(&DataType::Long, &DataType::decimal(38, 20)),
        DataType::Double
    );
    assert_eq!(
        most_general(&DataType::Double, &DataType::decimal(5, 2)),
        DataType::Double
    );
}

#[test]
fn test_struct_merge_unions_sorted_fields() {
    let a = strukt(&[("id", DataType::Long), ("name", DataType::String)]);
    let b = strukt(&[("email", DataType::String), ("id", DataType::Double)]);

    let merged = most_general(&a, &b);
    assert_eq!(
        merged,
        strukt(&[
            ("email", DataType::String),
            ("id", DataType::Double),
            ("name", DataType::String),
        ])
    );
    assert!(merged.fields().unwrap().iter().all(|f| f.nullable));
}

#[test]
fn test_array_merge_ors_element_nullability() {
    let a = DataType::Array {
        element: Box::new(DataType::Long),
        contains_null: false,
    };
    let b = DataType::Array {
        element: Box::new(DataType::Double),
        contains_null: true,
    };
    assert_eq!(most_general(&a, &b), DataType::array(DataType::Double));
}

#[test]
fn test_map_merge() {
    assert_eq!(
        most_general(
            &DataType::map(DataType::Long),
            &DataType::map(DataType::Boolean)
        ),
        DataType::map(DataType::String)
    );
}

#[test]
fn test_incompatible_types_fall_back_to_string() {
    let s = strukt(&[("a", DataType::Long)]);
    let arr = DataType::array(DataType::Long);

    assert_eq!(most_general(&s, &arr), DataType::String);
    assert_eq!(
        most_general(&DataType::Boolean, &DataType::Long),
        DataType::String
    );
    assert_eq!(
        most_general(&DataType::Date, &DataType::Long),
        DataType::String
    );
    assert_eq!(
        most_general(&DataType::Date, &DataType::Timestamp),
        DataType::Timestamp
    );
}

#[test]
fn test_user_type_resolves_to_sql_type() {
    let vector = DataType::User(UserType::new("vector", DataType::array(DataType::Double)));

    assert_eq!(most_general(&vector, &vector), vector);
    assert_eq!(
        most_general(&vector, &DataType::array(DataType::Long)),
        DataType::array(DataType::Double)
    );
    assert_eq!(vector.resolve(), &DataType::array(DataType::Double));
}

#[test]
fn test_merge_all_is_order_independent() {
    let types = vec![
        strukt(&[("a", DataType::Long)]),
        strukt(&[("b", DataType::String), ("a", DataType::Null)]),
        strukt(&[("a", DataType::Double)]),
        DataType::Null,
    ];
    let mut reversed = types.clone();
    reversed.reverse();

    assert_eq!(merge_all(types), merge_all(reversed));
    assert_eq!(merge_all(Vec::new()), DataType::Null);
}

#[test]
fn test_display() {
    let t = strukt(&[
        ("a", DataType::Long),
        ("b", DataType::array(DataType::decimal(10, 2))),
        ("c", DataType::map(DataType::Boolean)),
    ]);
    assert_eq!(
        t.to_string(),
        "struct<a:long,b:array<decimal(10,2)>,c:map<string,boolean>>"
    );
}

#[test]
fn test_schema_rejects_duplicates() {
    let err = Schema::try_new(vec![
        Field::nullable("a", DataType::Long),
        Field::nullable("a", DataType::String),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateSchemaField { ref name } if name == "a"));
}

#[test]
fn test_schema_rejects_nested_duplicates() {
    let nested = DataType::array(DataType::structure(vec![
        Field::nullable("x", DataType::Long),
        Field::nullable("x", DataType::Long),
    ]));
    let result = Schema::try_new(vec![Field::nullable("items", nested)]);
    assert!(matches!(result, Err(Error::DuplicateSchemaField { .. })));
}

#[test]
fn test_schema_case_insensitive_duplicates() {
    let fields = vec![
        Field::nullable("Name", DataType::String),
        Field::nullable("name", DataType::String),
    ];
    assert!(Schema::try_new_with_case(fields.clone(), true).is_ok());
    assert!(matches!(
        Schema::try_new_with_case(fields, false),
        Err(Error::DuplicateSchemaField { .. })
    ));
}

#[test]
fn test_schema_lookup() {
    let schema = Schema::try_new(vec![
        Field::nullable("a", DataType::Long),
        Field::nullable("b", DataType::String),
    ])
    .unwrap();

    assert_eq!(schema.len(), 2);
    assert_eq!(schema.index_of("b"), Some(1));
    assert_eq!(schema.field("a").unwrap().data_type, DataType::Long);
    assert!(schema.field("missing").is_none());
    assert!(Schema::empty().is_empty());
}

#[test]
fn test_schema_from_non_struct_is_empty() {
    let schema = Schema::from_type(DataType::String, true).unwrap();
    assert!(schema.is_empty());
}

#[test]
fn test_schema_json_roundtrip() {
    let schema = Schema::try_new(vec![
        Field::nullable("amount", DataType::decimal(12, 2)),
        Field::nullable("tags", DataType::array(DataType::String)),
        Field::nullable(
            "embedding",
            DataType::User(UserType::new("vector", DataType::array(DataType::Double))),
        ),
        Field::nullable(
            "owner",
            DataType::structure(vec![Field::nullable("id", DataType::Long)]),
        ),
    ])
    .unwrap();

    let json = schema.to_json().unwrap();
    assert_eq!(json["fields"][0]["data_type"]["type"], "decimal");
    assert_eq!(json["fields"][0]["data_type"]["precision"], 12);

    let parsed = Schema::from_json_str(&json.to_string()).unwrap();
    assert_eq!(parsed, schema);
}

#[test]
fn test_schema_pretty_json_parses_back() {
    let schema = Schema::try_new(vec![
        Field::nullable("at", DataType::Timestamp),
        Field::nullable("tags", DataType::array(DataType::String)),
    ])
    .unwrap();

    let pretty = schema.to_json_pretty().unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(Schema::from_json_str(&pretty).unwrap(), schema);
}
