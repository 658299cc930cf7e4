//! Schema module
//!
//! Defines the structural type universe and the lattice used to merge
//! independently observed types.
//!
//! # Features
//!
//! - **Type Universe**: Atomic, decimal, temporal, array, struct, map and alias types
//! - **Type Lattice**: Commutative, associative least-upper-bound merge
//! - **Schema Validation**: Duplicate field names are rejected at construction

mod lattice;
mod types;

pub use lattice::{merge_all, most_general};
pub use types::{DataType, Field, Schema, UserType, MAX_DECIMAL_PRECISION};

#[cfg(test)]
mod tests;
