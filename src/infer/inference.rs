//! Schema inference from JSON text records

use super::canonical::canonicalize;
use super::sampling::RecordSampler;
use crate::codec::{integral_digits, is_integral_literal, parse_date, parse_timestamp, ParsedLiteral};
use crate::config::CodecOptions;
use crate::error::Result;
use crate::schema::{most_general, DataType, Field, Schema, MAX_DECIMAL_PRECISION};
use rayon::prelude::*;
use regex::Regex;
use serde_json::{Number, Value as JsonValue};
use std::sync::LazyLock;
use tracing::debug;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

// 2024-01-15T10:30:00Z, 2024-01-15 10:30:00.123, 2024-01-15T10:30:00+00:00
static DATETIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").unwrap());

/// Schema inferrer with configuration options
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    options: CodecOptions,
}

impl SchemaInferrer {
    /// Create an inferrer with the given options
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Infer the type of a single record
    ///
    /// A record that fails to parse infers as a struct holding only the
    /// corrupt record column, so that column exists in the merged schema
    /// whenever any record was malformed.
    pub fn infer_one(&self, text: &str) -> DataType {
        match serde_json::from_str::<JsonValue>(text) {
            Ok(token) => self.infer_token(&token),
            Err(e) => {
                debug!(error = %e, "Malformed record during inference");
                self.corrupt_record_type()
            }
        }
    }

    /// Fold per-record types into one root type, in any order
    pub fn merge_all<I>(&self, types: I) -> DataType
    where
        I: IntoIterator<Item = DataType>,
    {
        types
            .into_iter()
            .fold(DataType::Null, |acc, t| self.merge_root(&acc, &t))
    }

    /// Merge two record-level types
    ///
    /// A top-level array stands for its elements, and a struct merged with a
    /// scalar record keeps the struct and gains the corrupt record column.
    /// Everything else goes through the type lattice.
    pub fn merge_root(&self, a: &DataType, b: &DataType) -> DataType {
        match (a, b) {
            (DataType::Array { element, .. }, other) | (other, DataType::Array { element, .. }) => {
                self.merge_root(element, other)
            }
            (DataType::Null, other) | (other, DataType::Null) => other.clone(),
            (strukt @ DataType::Struct { .. }, other) | (other, strukt @ DataType::Struct { .. })
                if !matches!(other, DataType::Struct { .. }) =>
            {
                most_general(strukt, &self.corrupt_record_type())
            }
            (a, b) => most_general(a, b),
        }
    }

    /// Infer a schema from a sequence of records
    ///
    /// Options are validated before any record is read. Per-record inference
    /// runs in parallel; the merge is associative and commutative, so the
    /// result does not depend on record order or partitioning.
    pub fn infer<I, S>(&self, records: I) -> Result<Schema>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> + Send + Sync,
    {
        self.options.validate()?;

        let sampler = RecordSampler::new(self.options.sampling_ratio, self.options.sampling_seed)?;
        let sampling = sampler.is_sampling();
        let records = sampler.sample(records);

        let root = records
            .par_iter()
            .map(|record| self.infer_one(record.as_ref()))
            .reduce(|| DataType::Null, |a, b| self.merge_root(&a, &b));

        let schema = match canonicalize(&root) {
            Some(DataType::Struct { fields }) => {
                Schema::try_new_with_case(fields, self.options.case_sensitive)?
            }
            _ => Schema::empty(),
        };

        debug!(
            records = records.len(),
            sampling,
            fields = schema.len(),
            "Inferred schema"
        );
        Ok(schema)
    }

    fn infer_token(&self, token: &JsonValue) -> DataType {
        match token {
            JsonValue::Null => DataType::Null,
            JsonValue::Bool(_) => DataType::Boolean,
            // Empty strings may be null markers; settled at canonicalization
            JsonValue::String(s) if s.is_empty() && self.options.empty_string_as_null => {
                DataType::Null
            }
            JsonValue::String(s) => self.infer_string(s),
            JsonValue::Number(n) => self.infer_number(n),
            JsonValue::Array(items) => DataType::array(
                items
                    .iter()
                    .fold(DataType::Null, |acc, item| most_general(&acc, &self.infer_token(item))),
            ),
            JsonValue::Object(map) => {
                let mut fields: Vec<Field> = map
                    .iter()
                    .map(|(key, value)| Field::nullable(key.clone(), self.infer_token(value)))
                    .collect();
                fields.sort_by(|a, b| a.name.cmp(&b.name));
                DataType::Struct { fields }
            }
        }
    }

    fn infer_string(&self, s: &str) -> DataType {
        if self.options.infer_timestamps {
            if DATE_PATTERN.is_match(s) && parse_date(s).is_ok() {
                return DataType::Date;
            }
            if DATETIME_PATTERN.is_match(s) && parse_timestamp(s).is_ok() {
                return DataType::Timestamp;
            }
        }
        DataType::String
    }

    fn infer_number(&self, n: &Number) -> DataType {
        if n.is_i64() {
            return DataType::Long;
        }
        let literal = n.to_string();
        if is_integral_literal(&literal) {
            // Beyond 64 bits
            let digits = integral_digits(&literal);
            return if digits <= usize::from(MAX_DECIMAL_PRECISION) {
                DataType::decimal(digits as u8, 0)
            } else {
                DataType::Double
            };
        }
        if self.options.prefers_decimal {
            if let Some((precision, scale)) =
                ParsedLiteral::parse(&literal).and_then(|p| p.decimal_type())
            {
                return DataType::decimal(precision, scale);
            }
        }
        DataType::Double
    }

    fn corrupt_record_type(&self) -> DataType {
        match &self.options.corrupt_record_column {
            Some(name) => DataType::Struct {
                fields: vec![Field::nullable(name.clone(), DataType::String)],
            },
            None => DataType::Null,
        }
    }
}

/// Infer a schema from records (convenience function)
pub fn infer_schema<I, S>(records: I, options: &CodecOptions) -> Result<Schema>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Send + Sync,
{
    SchemaInferrer::new(options.clone()).infer(records)
}
