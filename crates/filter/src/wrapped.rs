//! [`WrappedFilter`]: the immutable handle callers hold for a query
//!
//! Wraps the top-level filters of a request (implicitly AND-ed when there is
//! more than one) and computes the search-engine string once.

use crate::filter::Filter;
use crate::logical::AndFilter;
use serde_json::{Map, Value as JsonValue};

/// Root of a built filter with its cached search string
#[derive(Debug, Clone)]
pub struct WrappedFilter {
    filter: Filter,
    search_filter: String,
}

impl WrappedFilter {
    /// Wrap top-level filters
    ///
    /// No filters gives the empty filter, one filter is used as the root
    /// directly, and several are combined under an implicit `$and`.
    pub fn new(mut filters: Vec<Filter>) -> Self {
        let filter = match filters.len() {
            0 => Filter::Empty,
            1 => filters.remove(0),
            _ => Filter::And(AndFilter::from_filters(filters)),
        };
        let search_filter = filter.to_search_filter();
        WrappedFilter {
            filter,
            search_filter,
        }
    }

    /// The wrapper of no filter at all
    pub fn empty() -> Self {
        WrappedFilter::new(Vec::new())
    }

    /// True when the request carried no filter
    pub fn none(&self) -> bool {
        matches!(self.filter, Filter::Empty)
    }

    /// Cached search-engine filter string
    pub fn search_filter(&self) -> &str {
        &self.search_filter
    }

    /// True if the search engine can evaluate the whole filter
    pub fn is_search_indexed(&self) -> bool {
        self.filter.is_search_indexed()
    }

    /// Root of the tree
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Test a raw JSON document
    pub fn matches(&self, doc: &[u8]) -> bool {
        self.filter.matches(doc)
    }

    /// Test an already parsed document
    pub fn matches_doc(&self, doc: &Map<String, JsonValue>) -> bool {
        self.filter.matches_doc(doc)
    }
}

impl Default for WrappedFilter {
    fn default() -> Self {
        WrappedFilter::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::ValueMatcher;
    use crate::selector::Selector;
    use sieve_core::{FieldType, QueryableField, Value};
    use std::sync::Arc;

    fn selector(name: &str, n: f64) -> Filter {
        let f = Arc::new(QueryableField::new(name, FieldType::Double).search_indexed(true));
        Filter::Selector(Selector::new(f, None, ValueMatcher::eq(Value::Double(n)), None))
    }

    #[test]
    fn test_empty() {
        let w = WrappedFilter::new(vec![]);
        assert!(w.none());
        assert!(!w.is_search_indexed());
        assert_eq!(w.search_filter(), "");
        assert!(w.matches(b"{}"));
    }

    #[test]
    fn test_single_filter_is_root() {
        let w = WrappedFilter::new(vec![selector("a", 1.0)]);
        assert!(!w.none());
        assert!(matches!(w.filter(), Filter::Selector(_)));
        assert_eq!(w.search_filter(), "a:=1");
    }

    #[test]
    fn test_many_filters_implicit_and() {
        let w = WrappedFilter::new(vec![selector("a", 1.0), selector("b", 2.0)]);
        match w.filter() {
            Filter::And(and) => assert_eq!(and.filters().len(), 2),
            other => panic!("expected And, got {:?}", other),
        }
        assert!(w.is_search_indexed());
        assert_eq!(w.search_filter(), "a:=1&&b:=2");
        assert!(w.matches(br#"{"a": 1, "b": 2}"#));
        assert!(!w.matches(br#"{"a": 1, "b": 3}"#));
    }

    #[test]
    fn test_many_filters_keep_every_child() {
        let w = WrappedFilter::new(vec![selector("a", 1.0), selector("b", 2.0), selector("c", 3.0)]);
        assert!(!w.none());
        match w.filter() {
            Filter::And(and) => assert_eq!(and.filters().len(), 3),
            other => panic!("expected And, got {:?}", other),
        }
        assert!(!w.matches(br#"{}"#));
        assert!(w.matches(br#"{"a": 1, "b": 2, "c": 3}"#));
    }
}
