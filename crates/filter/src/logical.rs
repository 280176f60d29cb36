//! Logical combinators: [`AndFilter`] and [`OrFilter`]
//!
//! Children are evaluated left to right with short-circuiting. A combinator
//! is search indexed only when every child is; otherwise its search string
//! is empty and the whole query falls back to a storage scan.

use crate::filter::Filter;
use crate::search::{group, join, AND_TOKEN, OR_TOKEN};
use serde_json::{Map, Value as JsonValue};
use sieve_core::{Error, Result};

fn require_children(filters: &[Filter], op: &str) -> Result<()> {
    if filters.is_empty() {
        return Err(Error::malformed(format!(
            "{} requires at least one filter",
            op
        )));
    }
    Ok(())
}

fn search_part(filter: &Filter) -> String {
    match filter {
        Filter::And(_) | Filter::Or(_) => group(&filter.to_search_filter()),
        Filter::Empty | Filter::Selector(_) | Filter::Like(_) => filter.to_search_filter(),
    }
}

fn combined_search_filter(filters: &[Filter], token: &str) -> String {
    if !filters.iter().all(Filter::is_search_indexed) {
        return String::new();
    }
    let parts: Vec<String> = filters.iter().map(search_part).collect();
    join(&parts, token)
}

// ============================================================================
// AndFilter
// ============================================================================

/// Matches when every child matches
#[derive(Debug, Clone)]
pub struct AndFilter {
    filters: Vec<Filter>,
}

impl AndFilter {
    /// Create a conjunction; fails on an empty list
    pub fn new(filters: Vec<Filter>) -> Result<Self> {
        require_children(&filters, "$and")?;
        Ok(AndFilter::from_filters(filters))
    }

    /// Conjunction of filters the caller already knows to be non-empty
    pub(crate) fn from_filters(filters: Vec<Filter>) -> Self {
        debug_assert!(!filters.is_empty());
        AndFilter { filters }
    }

    /// Children in evaluation order
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Test a parsed document, stopping at the first non-match
    pub fn matches_doc(&self, doc: &Map<String, JsonValue>) -> bool {
        self.filters.iter().all(|f| f.matches_doc(doc))
    }

    /// True if every child is search indexed
    pub fn is_search_indexed(&self) -> bool {
        self.filters.iter().all(Filter::is_search_indexed)
    }

    /// Children joined with `&&`, or empty if any child is not indexed
    pub fn to_search_filter(&self) -> String {
        combined_search_filter(&self.filters, AND_TOKEN)
    }
}

// ============================================================================
// OrFilter
// ============================================================================

/// Matches when any child matches
#[derive(Debug, Clone)]
pub struct OrFilter {
    filters: Vec<Filter>,
}

impl OrFilter {
    /// Create a disjunction; fails on an empty list
    pub fn new(filters: Vec<Filter>) -> Result<Self> {
        require_children(&filters, "$or")?;
        Ok(OrFilter { filters })
    }

    /// Children in evaluation order
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Test a parsed document, stopping at the first match
    pub fn matches_doc(&self, doc: &Map<String, JsonValue>) -> bool {
        self.filters.iter().any(|f| f.matches_doc(doc))
    }

    /// True if every child is search indexed
    pub fn is_search_indexed(&self) -> bool {
        self.filters.iter().all(Filter::is_search_indexed)
    }

    /// Children joined with `||`, or empty if any child is not indexed
    pub fn to_search_filter(&self) -> String {
        combined_search_filter(&self.filters, OR_TOKEN)
    }
}
