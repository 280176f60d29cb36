//! Leaf filters: [`Selector`] and [`LikeFilter`]
//!
//! Both read the target field out of the document (through the parent field
//! when one is set) and test every extracted value. When a value is an array
//! the test is existential: one satisfying element is enough. The exception
//! is a selector whose bound value is itself an array, which compares the
//! whole array.

use crate::document::candidates;
use crate::matcher::ValueMatcher;
use crate::pattern::LikeMatcher;
use crate::search::render_comparison;
use serde_json::{Map, Value as JsonValue};
use sieve_core::{Collation, FieldType, QueryableField, Value};
use std::sync::Arc;

// ============================================================================
// Selector
// ============================================================================

/// One field tested with one value matcher
#[derive(Debug, Clone)]
pub struct Selector {
    field: Arc<QueryableField>,
    parent: Option<Arc<QueryableField>>,
    matcher: ValueMatcher,
    collation: Option<Collation>,
}

impl Selector {
    /// Create a selector
    ///
    /// `collation` is the one resolved at parse time; `None` means the
    /// default case-sensitive collation.
    pub fn new(
        field: Arc<QueryableField>,
        parent: Option<Arc<QueryableField>>,
        matcher: ValueMatcher,
        collation: Option<Collation>,
    ) -> Self {
        Selector {
            field,
            parent,
            matcher,
            collation,
        }
    }

    /// Target field
    pub fn field(&self) -> &QueryableField {
        &self.field
    }

    /// Parent field the target is read through
    pub fn parent(&self) -> Option<&QueryableField> {
        self.parent.as_deref()
    }

    /// The matcher
    pub fn matcher(&self) -> &ValueMatcher {
        &self.matcher
    }

    /// Collation resolved at parse time
    pub fn collation(&self) -> Option<Collation> {
        self.collation
    }

    /// Test a parsed document
    pub fn matches_doc(&self, doc: &Map<String, JsonValue>) -> bool {
        let values = candidates(doc, &self.field, self.parent.as_deref());
        if values.is_empty() {
            return self.matcher.matches(&Value::Null);
        }
        values.into_iter().any(|raw| self.test(raw))
    }

    fn test(&self, raw: &JsonValue) -> bool {
        match raw {
            JsonValue::Array(items) if !self.matcher.value().is_array() => {
                items.iter().any(|item| self.test_one(item))
            }
            other => self.test_one(other),
        }
    }

    fn test_one(&self, raw: &JsonValue) -> bool {
        let bound = self.matcher.value();
        let field_type = match bound {
            Value::Null => FieldType::of_json(raw),
            // 10.0 or 1e20 against an int bound compares numerically
            Value::Int(_) if raw.is_number() && !raw.is_i64() => FieldType::Double,
            other => other.field_type(),
        };
        Value::from_json(field_type, raw, Some(self.collation.unwrap_or_default()))
            .map(|doc_value| self.matcher.matches(&doc_value))
            .unwrap_or(false)
    }

    /// True if the search engine can evaluate this selector
    pub fn is_search_indexed(&self) -> bool {
        self.field.is_search_indexed() && self.render().is_some()
    }

    /// Search-engine rendering, empty when not search indexed
    pub fn to_search_filter(&self) -> String {
        if !self.field.is_search_indexed() {
            return String::new();
        }
        self.render().unwrap_or_default()
    }

    /// `None` for case-insensitive string comparisons, which the search
    /// engine would evaluate case sensitively
    fn render(&self) -> Option<String> {
        let value = self.matcher.value();
        let case_insensitive = self.collation.is_some_and(|c| c.is_case_insensitive());
        if case_insensitive && value.as_str().is_some() {
            return None;
        }
        render_comparison(self.field.name(), self.matcher.op(), value)
    }
}

// ============================================================================
// LikeFilter
// ============================================================================

/// One field tested with one pattern matcher; never search indexed
#[derive(Debug, Clone)]
pub struct LikeFilter {
    field: Arc<QueryableField>,
    parent: Option<Arc<QueryableField>>,
    matcher: LikeMatcher,
}

impl LikeFilter {
    /// Create a pattern filter
    pub fn new(
        field: Arc<QueryableField>,
        parent: Option<Arc<QueryableField>>,
        matcher: LikeMatcher,
    ) -> Self {
        LikeFilter {
            field,
            parent,
            matcher,
        }
    }

    /// Target field
    pub fn field(&self) -> &QueryableField {
        &self.field
    }

    /// The matcher
    pub fn matcher(&self) -> &LikeMatcher {
        &self.matcher
    }

    /// Test a parsed document
    pub fn matches_doc(&self, doc: &Map<String, JsonValue>) -> bool {
        let values = candidates(doc, &self.field, self.parent.as_deref());
        if values.is_empty() {
            return self.matcher.matches(&Value::Null);
        }
        values.into_iter().any(|raw| match raw {
            JsonValue::Array(items) => items.iter().any(|item| self.test_one(item)),
            other => self.test_one(other),
        })
    }

    fn test_one(&self, raw: &JsonValue) -> bool {
        Value::from_json(FieldType::Unknown, raw, None)
            .map(|doc_value| self.matcher.matches(&doc_value))
            .unwrap_or(false)
    }
}
