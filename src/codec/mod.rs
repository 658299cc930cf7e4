//! Row codec module
//!
//! Decodes JSON text records into typed rows under a schema and encodes typed
//! rows back into JSON text.
//!
//! # Overview
//!
//! Decoding is lossy: object keys the schema does not declare are
//! discarded, while map-typed positions keep every key. Encoding omits null
//! struct fields, which decode reads back as null.

mod decimal;
mod decoder;
mod encoder;
mod temporal;
mod types;

pub use decimal::Decimal;
pub use decoder::{decode, DecodedRows, RowDecoder};
pub use encoder::{encode, encode_value, RowEncoder};
pub use temporal::{format_date, format_timestamp, parse_date, parse_timestamp};
pub use types::{Row, TokenKind, Value};

pub(crate) use decimal::{integral_digits, is_integral_literal, ParsedLiteral};
