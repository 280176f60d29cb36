//! Core types for Sieve
//!
//! This crate defines what the filter engine consumes from the rest of the
//! database:
//! - Error: Error type shared by parsing and configuration
//! - Collation: String comparison policy (case sensitivity, sort-key order)
//! - Value: Typed, comparable field value built from JSON
//! - Schema: FieldType, QueryableField and the FieldDirectory
//! - Config: FilterConfig loaded from `sieve.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collation;
pub mod config;
pub mod error;
pub mod schema;
pub mod value;

pub use collation::{Case, Collation, CollationRequest, COLLATION_KEY};
pub use config::{FilterConfig, CONFIG_FILE_NAME, DEFAULT_MAX_NESTING_DEPTH};
pub use error::{Error, ErrorKind, Result};
pub use schema::{FieldDirectory, FieldType, QueryableField};
pub use value::{StringValue, Value};
