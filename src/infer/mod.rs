//! Schema inference module
//!
//! Infers one schema for a collection of JSON text records. Each record is
//! typed independently, the per-record types are folded with the type
//! lattice, and the result is canonicalized into a schema.
//!
//! # Example
//!
//! ```rust
//! use solidafy_json::config::CodecOptions;
//! use solidafy_json::infer::infer_schema;
//!
//! let records = [r#"{"a": 1}"#, r#"{"a": 2.5, "b": "x"}"#];
//! let schema = infer_schema(records, &CodecOptions::default()).unwrap();
//! assert_eq!(schema.to_string(), "struct<a:double,b:string>");
//! ```

mod canonical;
mod inference;
mod sampling;

pub use canonical::canonicalize;
pub use inference::{infer_schema, SchemaInferrer};
pub use sampling::RecordSampler;
