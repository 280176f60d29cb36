//! Query filter engine for Sieve
//!
//! This crate provides:
//! - Factory: parses client filter JSON against a field directory
//! - Filter: the closed set of tree nodes (Empty, Selector, And, Or, Like)
//! - ValueMatcher / LikeMatcher: comparison and pattern tests
//! - WrappedFilter: the per-request handle with a cached search string
//! - Search rendering: pushdown of indexed filters to the search engine
//!
//! # Usage
//!
//! ```
//! use sieve_core::{FieldDirectory, FieldType, QueryableField};
//! use sieve_filter::Factory;
//!
//! let directory = FieldDirectory::new(vec![
//!     QueryableField::new("f1", FieldType::Int).search_indexed(true),
//! ]);
//! let filter = Factory::new(&directory, None)
//!     .wrapped_filter(br#"{"f1": {"$gt": 10}}"#)
//!     .unwrap();
//!
//! assert!(filter.matches(br#"{"f1": 15}"#));
//! assert_eq!(filter.search_filter(), "f1:>10");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod document;
pub mod factory;
pub mod filter;
pub mod logical;
pub mod matcher;
pub mod pattern;
pub mod search;
pub mod selector;
mod unique;
pub mod wrapped;

// Re-export commonly used types
pub use factory::{is_none, Factory, AND_OP, OR_OP};
pub use filter::Filter;
pub use logical::{AndFilter, OrFilter};
pub use matcher::{ComparisonOp, ValueMatcher};
pub use pattern::{LikeMatcher, PatternOp};
pub use selector::{LikeFilter, Selector};
pub use wrapped::WrappedFilter;
