//! Sieve - query filter engine for a multi-tenant document database
//!
//! Sieve turns a client-supplied JSON filter into a predicate tree that can
//! test documents during storage scans, and into an equivalent filter string
//! the search engine can evaluate.
//!
//! # Quick Start
//!
//! ```
//! use sieve::{Factory, FieldDirectory, FieldType, QueryableField};
//!
//! let directory = FieldDirectory::new(vec![
//!     QueryableField::new("name", FieldType::String).search_indexed(true),
//!     QueryableField::new("age", FieldType::Int).search_indexed(true),
//! ]);
//! let filter = Factory::new(&directory, None)
//!     .wrapped_filter(br#"{"name": "alice", "age": {"$gte": 18}}"#)
//!     .unwrap();
//!
//! assert!(filter.matches(br#"{"name": "alice", "age": 30}"#));
//! assert!(filter.is_search_indexed());
//! assert_eq!(filter.search_filter(), "name:=`alice`&&age:>=18");
//! ```
//!
//! # Architecture
//!
//! Collaborator types (values, collation, schema fields, configuration) live
//! in `sieve-core`; the filter tree and its parser live in `sieve-filter`.
//! Both are re-exported here.

pub use sieve_core::*;
pub use sieve_filter::*;
