//! Conversion of schemas and decoded rows to Arrow

use crate::codec::{Row, RowEncoder};
use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};
use arrow::datatypes::{
    DataType as ArrowType, Field as ArrowField, Fields, Schema as ArrowSchema, TimeUnit,
};
use arrow::json::ReaderBuilder;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

const UTC_OFFSET: &str = "+00:00";

/// Map a lattice type to its Arrow counterpart
///
/// Binary has no JSON text form the Arrow reader understands, so it is
/// rejected here rather than at batch build time.
pub fn to_arrow_type(data_type: &DataType) -> Result<ArrowType> {
    let arrow_type = match data_type {
        DataType::Null => ArrowType::Null,
        DataType::String => ArrowType::Utf8,
        DataType::Boolean => ArrowType::Boolean,
        DataType::Byte => ArrowType::Int8,
        DataType::Short => ArrowType::Int16,
        DataType::Integer => ArrowType::Int32,
        DataType::Long => ArrowType::Int64,
        DataType::Float => ArrowType::Float32,
        DataType::Double => ArrowType::Float64,
        DataType::Decimal { precision, scale } => {
            ArrowType::Decimal128(*precision, i8::try_from(*scale).map_err(|_| {
                Error::output(format!("Decimal scale {scale} exceeds Arrow limits"))
            })?)
        }
        DataType::Date => ArrowType::Date32,
        // Offset zone: named zones need arrow's chrono-tz feature
        DataType::Timestamp => ArrowType::Timestamp(TimeUnit::Microsecond, Some(UTC_OFFSET.into())),
        DataType::Binary => {
            return Err(Error::output(
                "Binary columns cannot be converted from JSON text",
            ))
        }
        DataType::Array {
            element,
            contains_null,
        } => ArrowType::List(Arc::new(ArrowField::new(
            "item",
            to_arrow_type(element)?,
            *contains_null,
        ))),
        DataType::Map {
            value,
            value_contains_null,
        } => {
            let entries = ArrowField::new(
                "entries",
                ArrowType::Struct(Fields::from(vec![
                    ArrowField::new("keys", ArrowType::Utf8, false),
                    ArrowField::new("values", to_arrow_type(value)?, *value_contains_null),
                ])),
                false,
            );
            ArrowType::Map(Arc::new(entries), false)
        }
        DataType::Struct { fields } => ArrowType::Struct(to_arrow_fields(fields)?),
        DataType::User(user) => to_arrow_type(&user.sql_type)?,
    };
    Ok(arrow_type)
}

/// Convert a schema to an Arrow schema with the same field order
pub fn to_arrow_schema(schema: &Schema) -> Result<ArrowSchema> {
    Ok(ArrowSchema::new(to_arrow_fields(schema.fields())?))
}

/// Convert decoded rows to an Arrow RecordBatch
///
/// Rows are re-encoded as JSON lines and read back by the Arrow JSON decoder,
/// so every value goes through the same text form `encode` produces.
pub fn rows_to_record_batch(schema: &Schema, rows: &[Row]) -> Result<RecordBatch> {
    let arrow_schema = Arc::new(to_arrow_schema(schema)?);

    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(arrow_schema));
    }

    if schema.is_empty() {
        let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
        return RecordBatch::try_new_with_options(arrow_schema, vec![], &options)
            .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")));
    }

    let encoder = RowEncoder::new(schema);
    let mut text = String::new();
    for row in rows {
        text.push_str(&encoder.encode(row)?);
        text.push('\n');
    }

    let mut decoder = ReaderBuilder::new(Arc::clone(&arrow_schema))
        .with_batch_size(rows.len())
        .build_decoder()?;
    let read = decoder.decode(text.as_bytes())?;
    if read != text.len() {
        return Err(Error::output(format!(
            "Arrow decoder stopped after {read} of {} bytes",
            text.len()
        )));
    }

    match decoder.flush()? {
        Some(batch) => Ok(batch),
        None => Ok(RecordBatch::new_empty(arrow_schema)),
    }
}

fn to_arrow_fields(fields: &[Field]) -> Result<Fields> {
    fields
        .iter()
        .map(|field| {
            Ok(ArrowField::new(
                &field.name,
                to_arrow_type(&field.data_type)?,
                field.nullable,
            ))
        })
        .collect::<Result<Vec<_>>>()
        .map(Fields::from)
}
