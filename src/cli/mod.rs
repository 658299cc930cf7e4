//! CLI module
//!
//! Command-line interface for inferring schemas and normalizing records.
//!
//! # Commands
//!
//! - `infer` - Infer a schema from a JSON Lines file
//! - `normalize` - Decode records under a schema and re-encode them

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
