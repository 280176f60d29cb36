//! The filter tree
//!
//! A client filter maps onto a small closed set of node kinds:
//!
//! ```text
//! {"f1": 10}                               --> Selector
//! {"f1": 10, "f2": {"$gt": 5}}             --> And(Selector, Selector)
//! {"$or": [{"f3": 20}, {"f4": {"$regex": "^a"}}]}
//!                                          --> Or(Selector, Like)
//! {}                                       --> Empty
//! ```
//!
//! The default rule between sibling clauses is `$and` and the default
//! comparison is `$eq`. A built tree is immutable and safe to share across
//! scan workers.

use crate::logical::{AndFilter, OrFilter};
use crate::selector::{LikeFilter, Selector};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

/// One node of a filter tree
#[derive(Debug, Clone)]
pub enum Filter {
    /// Matches every document; never search indexed
    Empty,
    /// Field compared against a value
    Selector(Selector),
    /// All children must match
    And(AndFilter),
    /// Any child must match
    Or(OrFilter),
    /// Field tested against a pattern; never search indexed
    Like(LikeFilter),
}

impl Filter {
    /// Test a raw JSON document
    ///
    /// Bytes that are not a JSON object never match (except under `Empty`).
    pub fn matches(&self, doc: &[u8]) -> bool {
        if let Filter::Empty = self {
            return true;
        }
        match serde_json::from_slice::<Map<String, JsonValue>>(doc) {
            Ok(parsed) => self.matches_doc(&parsed),
            Err(e) => {
                warn!(error = %e, "document is not a JSON object, treating as non-matching");
                false
            }
        }
    }

    /// Test an already parsed document
    pub fn matches_doc(&self, doc: &Map<String, JsonValue>) -> bool {
        match self {
            Filter::Empty => true,
            Filter::Selector(s) => s.matches_doc(doc),
            Filter::And(a) => a.matches_doc(doc),
            Filter::Or(o) => o.matches_doc(doc),
            Filter::Like(l) => l.matches_doc(doc),
        }
    }

    /// Search-engine filter string; empty when not search indexed
    pub fn to_search_filter(&self) -> String {
        match self {
            Filter::Empty | Filter::Like(_) => String::new(),
            Filter::Selector(s) => s.to_search_filter(),
            Filter::And(a) => a.to_search_filter(),
            Filter::Or(o) => o.to_search_filter(),
        }
    }

    /// True if the search engine can evaluate this whole subtree
    pub fn is_search_indexed(&self) -> bool {
        match self {
            Filter::Empty | Filter::Like(_) => false,
            Filter::Selector(s) => s.is_search_indexed(),
            Filter::And(a) => a.is_search_indexed(),
            Filter::Or(o) => o.is_search_indexed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::ValueMatcher;
    use serde_json::json;
    use sieve_core::{FieldType, QueryableField, Value};
    use std::sync::Arc;

    fn selector(name: &str, n: f64) -> Filter {
        let f = Arc::new(QueryableField::new(name, FieldType::Double).search_indexed(true));
        Filter::Selector(Selector::new(f, None, ValueMatcher::eq(Value::Double(n)), None))
    }

    #[test]
    fn test_empty_filter() {
        let f = Filter::Empty;
        assert!(f.matches(b"{\"a\":1}"));
        assert!(f.matches(b"not json"));
        assert!(f.matches_doc(&Map::new()));
        assert_eq!(f.to_search_filter(), "");
        assert!(!f.is_search_indexed());
    }

    #[test]
    fn test_matches_raw_bytes() {
        let f = selector("f1", 10.0);
        assert!(f.matches(br#"{"f1": 10}"#));
        assert!(!f.matches(br#"{"f1": 11}"#));
    }

    #[test]
    fn test_malformed_document_does_not_match() {
        let f = selector("f1", 10.0);
        assert!(!f.matches(b"{"));
        assert!(!f.matches(b"[1,2]"));
    }

    #[test]
    fn test_matches_and_matches_doc_agree() {
        let f = selector("f1", 10.0);
        let raw = json!({"f1": 10, "f2": "x"});
        let bytes = serde_json::to_vec(&raw).unwrap();
        assert_eq!(f.matches(&bytes), f.matches_doc(raw.as_object().unwrap()));
    }

    #[test]
    fn test_filter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filter>();
    }
}
