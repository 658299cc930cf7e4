// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy JSON
//!
//! Schema inference and a typed row codec for semi-structured JSON records.
//!
//! ## Features
//!
//! - **Schema Inference**: One schema for a whole record collection, independent of record order
//! - **Type Lattice**: Associative, commutative widening of numeric, temporal and nested types
//! - **Row Codec**: Decode JSON text into typed rows and encode rows back into JSON text
//! - **Corrupt Records**: Malformed input is preserved in a configurable string column
//! - **Arrow Output**: Convert schemas and decoded rows to Arrow RecordBatches
//!
//! ## Quick Start
//!
//! ```rust
//! use solidafy_json::{decode, encode, infer_schema, CodecOptions};
//!
//! let records = [r#"{"id": 1, "name": "a"}"#, r#"{"id": 2, "tags": ["x"]}"#];
//! let options = CodecOptions::default();
//!
//! let schema = infer_schema(records, &options)?;
//! assert_eq!(schema.to_string(), "struct<id:long,name:string,tags:array<string>>");
//!
//! for row in decode(records, &schema, &options) {
//!     println!("{}", encode(&schema, &row?)?);
//! }
//! # Ok::<(), solidafy_json::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   infer    ┌──────────────┐   decode   ┌───────────┐
//! │ JSON records  │ ─────────> │    Schema    │ ─────────> │   Rows    │
//! │ (RecordSource)│            │ (DataType    │            │  (Value)  │
//! └───────────────┘            │  lattice)    │ <───────── └───────────┘
//!                              └──────────────┘   encode         │
//!                                                                 v
//!                                                          Arrow RecordBatch
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Codec options
pub mod config;

/// Data types, schemas and the type lattice
pub mod schema;

/// Schema inference
pub mod infer;

/// Row decode and encode
pub mod codec;

/// Arrow output
pub mod output;

/// Record sources
pub mod source;

/// CLI implementation
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

// Re-export commonly used types
pub use codec::{decode, encode, Row, Value};
pub use config::CodecOptions;
pub use infer::{infer_schema, SchemaInferrer};
pub use schema::{DataType, Field, Schema};
pub use source::{JsonLinesSource, MemorySource, RecordSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
