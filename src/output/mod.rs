//! Output module
//!
//! Converts schemas and decoded rows to Apache Arrow.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Mapping lattice types and schemas to Arrow types and schemas
//! - Building Arrow RecordBatches from decoded rows

mod batch;

pub use batch::{rows_to_record_batch, to_arrow_schema, to_arrow_type};

#[cfg(test)]
mod tests;
