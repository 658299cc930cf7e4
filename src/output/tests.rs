//! Tests for output module

use super::*;
use crate::codec::{Decimal, Row, Value};
use crate::error::Error;
use crate::schema::{DataType, Field, Schema, UserType};
use arrow::array::{
    Array, Decimal128Array, Float64Array, Int64Array, ListArray, MapArray, StringArray,
    StructArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType as ArrowType, TimeUnit};

fn schema(fields: Vec<(&str, DataType)>) -> Schema {
    Schema::try_new(
        fields
            .into_iter()
            .map(|(name, dt)| Field::nullable(name, dt))
            .collect(),
    )
    .unwrap()
}

// ============================================================================
// Type Mapping Tests
// ============================================================================

#[test]
fn test_primitive_type_mapping() {
    assert_eq!(to_arrow_type(&DataType::Long).unwrap(), ArrowType::Int64);
    assert_eq!(to_arrow_type(&DataType::Double).unwrap(), ArrowType::Float64);
    assert_eq!(to_arrow_type(&DataType::String).unwrap(), ArrowType::Utf8);
    assert_eq!(to_arrow_type(&DataType::Date).unwrap(), ArrowType::Date32);
    assert_eq!(
        to_arrow_type(&DataType::decimal(12, 3)).unwrap(),
        ArrowType::Decimal128(12, 3)
    );
    assert_eq!(
        to_arrow_type(&DataType::Timestamp).unwrap(),
        ArrowType::Timestamp(TimeUnit::Microsecond, Some("+00:00".into()))
    );
}

#[test]
fn test_nested_type_mapping() {
    let ArrowType::List(item) = to_arrow_type(&DataType::array(DataType::Long)).unwrap() else {
        panic!("expected list");
    };
    assert_eq!(item.data_type(), &ArrowType::Int64);
    assert!(item.is_nullable());

    let ArrowType::Map(entries, sorted) = to_arrow_type(&DataType::map(DataType::Double)).unwrap()
    else {
        panic!("expected map");
    };
    assert!(!sorted);
    let ArrowType::Struct(kv) = entries.data_type() else {
        panic!("expected entries struct");
    };
    assert_eq!(kv[0].data_type(), &ArrowType::Utf8);
    assert_eq!(kv[1].data_type(), &ArrowType::Float64);
}

#[test]
fn test_user_type_maps_to_sql_type() {
    let vector = DataType::User(UserType::new("vector", DataType::array(DataType::Double)));
    assert_eq!(
        to_arrow_type(&vector).unwrap(),
        to_arrow_type(&DataType::array(DataType::Double)).unwrap()
    );
}

#[test]
fn test_binary_is_rejected() {
    let err = to_arrow_type(&DataType::Binary).unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
}

#[test]
fn test_schema_keeps_field_order() {
    let schema = schema(vec![("b", DataType::Long), ("a", DataType::String)]);
    let arrow_schema = to_arrow_schema(&schema).unwrap();
    let names: Vec<&str> = arrow_schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

// ============================================================================
// RecordBatch Tests
// ============================================================================

#[test]
fn test_rows_to_batch_simple() {
    let schema = schema(vec![("id", DataType::Long), ("name", DataType::String)]);
    let rows = vec![
        Row::new(vec![Value::Long(1), Value::from("Alice")]),
        Row::new(vec![Value::Long(2), Value::Null]),
    ];

    let batch = rows_to_record_batch(&schema, &rows).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 2);

    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ids.value(1), 2);

    let names = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "Alice");
    assert!(names.is_null(1));
}

#[test]
fn test_rows_to_batch_empty() {
    let schema = schema(vec![("id", DataType::Long)]);
    let batch = rows_to_record_batch(&schema, &[]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 1);
}

#[test]
fn test_rows_to_batch_without_fields() {
    let batch = rows_to_record_batch(&Schema::empty(), &[Row::nulls(0), Row::nulls(0)]).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 0);
}

#[test]
fn test_rows_to_batch_decimal_and_timestamp() {
    let schema = schema(vec![
        ("amount", DataType::decimal(10, 2)),
        ("at", DataType::Timestamp),
    ]);
    let rows = vec![Row::new(vec![
        Value::Decimal(Decimal::from_literal("12.34", 10, 2).unwrap()),
        Value::Timestamp(1_705_314_600_000_000),
    ])];

    let batch = rows_to_record_batch(&schema, &rows).unwrap();
    let amounts = batch
        .column(0)
        .as_any()
        .downcast_ref::<Decimal128Array>()
        .unwrap();
    assert_eq!(amounts.value(0), 1234);

    let times = batch
        .column(1)
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
        .unwrap();
    assert_eq!(times.value(0), 1_705_314_600_000_000);
}

#[test]
fn test_rows_to_batch_nested() {
    let inner = DataType::structure(vec![Field::nullable("x", DataType::Long)]);
    let schema = schema(vec![
        ("tags", DataType::array(DataType::Double)),
        ("attrs", DataType::map(DataType::String)),
        ("obj", inner),
    ]);
    let rows = vec![Row::new(vec![
        Value::Array(vec![Value::Double(1.5), Value::Null]),
        Value::Map(vec![("k".to_string(), Value::from("v"))]),
        Value::Struct(Row::new(vec![Value::Long(7)])),
    ])];

    let batch = rows_to_record_batch(&schema, &rows).unwrap();

    let tags = batch
        .column(0)
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    let values = tags.value(0);
    let values = values.as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values.value(0), 1.5);
    assert!(values.is_null(1));

    let attrs = batch
        .column(1)
        .as_any()
        .downcast_ref::<MapArray>()
        .unwrap();
    assert_eq!(attrs.value(0).len(), 1);

    let obj = batch
        .column(2)
        .as_any()
        .downcast_ref::<StructArray>()
        .unwrap();
    let x = obj.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(x.value(0), 7);
}

#[test]
fn test_rows_to_batch_with_binary_fails() {
    let schema = schema(vec![("data", DataType::Binary)]);
    let rows = vec![Row::new(vec![Value::Binary(vec![1, 2, 3])])];
    assert!(matches!(
        rows_to_record_batch(&schema, &rows),
        Err(Error::Output { .. })
    ));
}
