//! [`Factory`]: parses filter JSON into a filter tree
//!
//! Top-level keys are processed in document order. `$and` / `$or` take an
//! array of filter objects; any other key names a field and takes either a
//! literal (implicit `$eq`) or an operator object:
//!
//! ```json
//! {
//!   "status": "active",
//!   "age": {"$gte": 18, "$lt": 65},
//!   "name": {"$regex": "^a", "$collation": {"case": "ci"}},
//!   "$or": [{"tier": "gold"}, {"spend": {"$gt": 1000}}]
//! }
//! ```
//!
//! Parsing is fail-fast: the first error aborts the whole parse and no
//! partial tree is returned. A key repeated within one object is malformed.
//!
//! ## Collation precedence
//!
//! 1. Building for a secondary index: values always use the factory's
//!    sort-key collation, and a case-insensitive `$collation` is rejected.
//! 2. A `$collation` inside the operator object.
//! 3. The factory's request-level collation.
//! 4. The default (case sensitive).

use crate::filter::Filter;
use crate::logical::{AndFilter, OrFilter};
use crate::matcher::{ComparisonOp, ValueMatcher};
use crate::pattern::{LikeMatcher, PatternOp};
use crate::selector::{LikeFilter, Selector};
use crate::unique;
use crate::wrapped::WrappedFilter;
use serde_json::{Map, Value as JsonValue};
use sieve_core::{
    Collation, CollationRequest, Error, FieldDirectory, FieldType, FilterConfig, QueryableField,
    Result, Value, COLLATION_KEY, DEFAULT_MAX_NESTING_DEPTH,
};
use std::sync::Arc;
use tracing::debug;

/// `$and`
pub const AND_OP: &str = "$and";
/// `$or`
pub const OR_OP: &str = "$or";

const FILTER_NONE: &[u8] = b"{}";

/// True for the two spellings of "no filter": empty bytes and `{}`
pub fn is_none(raw: &[u8]) -> bool {
    raw.is_empty() || raw == FILTER_NONE
}

type FieldRef = (Arc<QueryableField>, Option<Arc<QueryableField>>);

/// Builds filter trees against one field directory
#[derive(Debug, Clone)]
pub struct Factory<'a> {
    directory: &'a FieldDirectory,
    collation: Option<Collation>,
    // For secondary indexes:
    // 1. Reject case insensitive operator collations
    // 2. Always build values with the factory collation, a sort-key collation
    for_secondary_index: bool,
    max_depth: usize,
}

impl<'a> Factory<'a> {
    /// Factory for primary scans and search queries
    pub fn new(directory: &'a FieldDirectory, collation: Option<Collation>) -> Self {
        Factory {
            directory,
            collation,
            for_secondary_index: false,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Factory whose trees drive a secondary index range scan
    pub fn for_secondary_index(directory: &'a FieldDirectory) -> Self {
        Factory {
            directory,
            collation: Some(Collation::sort_key()),
            for_secondary_index: true,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Factory using the collation and depth limit from configuration
    pub fn from_config(directory: &'a FieldDirectory, config: &FilterConfig) -> Result<Self> {
        Ok(Factory::new(directory, config.collation()?).with_max_depth(config.max_nesting_depth))
    }

    /// Override the `$and`/`$or` nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Request-level collation
    pub fn collation(&self) -> Option<Collation> {
        self.collation
    }

    /// True if building for a secondary index
    pub fn is_for_secondary_index(&self) -> bool {
        self.for_secondary_index
    }

    /// Parse and wrap in one step
    pub fn wrapped_filter(&self, raw: &[u8]) -> Result<WrappedFilter> {
        let filters = self.factorize(raw)?;
        let wrapped = WrappedFilter::new(filters);
        debug!(
            none = wrapped.none(),
            search_indexed = wrapped.is_search_indexed(),
            "built wrapped filter"
        );
        Ok(wrapped)
    }

    /// Parse filter bytes into top-level filters, one per key
    ///
    /// Empty bytes and `{}` yield no filters.
    pub fn factorize(&self, raw: &[u8]) -> Result<Vec<Filter>> {
        if is_none(raw) {
            return Ok(Vec::new());
        }
        let parsed = unique::from_slice(raw)?;
        let clauses = parsed
            .as_object()
            .ok_or_else(|| Error::malformed("filter must be a JSON object"))?;
        let filters = self.parse_clauses(clauses, 0)?;
        debug!(clauses = filters.len(), "factorized filter");
        Ok(filters)
    }

    /// Parse the array value of an `$and` key
    pub fn unmarshal_and(&self, input: &JsonValue) -> Result<Filter> {
        self.parse_logical(AND_OP, input, 1)
    }

    /// Parse the array value of an `$or` key
    pub fn unmarshal_or(&self, input: &JsonValue) -> Result<Filter> {
        self.parse_logical(OR_OP, input, 1)
    }

    fn parse_clauses(&self, clauses: &Map<String, JsonValue>, depth: usize) -> Result<Vec<Filter>> {
        clauses
            .iter()
            .map(|(key, value)| match key.as_str() {
                AND_OP | OR_OP => self.parse_logical(key, value, depth + 1),
                _ => self.parse_selector(key, value),
            })
            .collect()
    }

    fn parse_logical(&self, op: &str, input: &JsonValue, depth: usize) -> Result<Filter> {
        if depth > self.max_depth {
            return Err(Error::NestingTooDeep {
                depth,
                max: self.max_depth,
            });
        }
        let items = input
            .as_array()
            .ok_or_else(|| Error::malformed(format!("{} expects an array of filters", op)))?;
        let children = items
            .iter()
            .map(|item| self.parse_element(op, item, depth))
            .collect::<Result<Vec<_>>>()?;

        if op == AND_OP {
            AndFilter::new(children).map(Filter::And)
        } else {
            OrFilter::new(children).map(Filter::Or)
        }
    }

    /// One element of an `$and`/`$or` list; several keys are AND-ed
    fn parse_element(&self, op: &str, item: &JsonValue, depth: usize) -> Result<Filter> {
        let clauses = item
            .as_object()
            .ok_or_else(|| Error::malformed(format!("{} elements must be filter objects", op)))?;
        let mut filters = self.parse_clauses(clauses, depth)?;
        match filters.len() {
            0 => Err(Error::malformed(format!("{} contains an empty filter", op))),
            1 => Ok(filters.remove(0)),
            _ => Ok(Filter::And(AndFilter::from_filters(filters))),
        }
    }

    /// Parse one `field: value` clause
    pub fn parse_selector(&self, name: &str, value: &JsonValue) -> Result<Filter> {
        let (field, parent) = self.resolve_field(name)?;
        match value {
            JsonValue::Object(ops) => self.parse_operators(name, field, parent, ops),
            JsonValue::Bool(_)
            | JsonValue::Number(_)
            | JsonValue::String(_)
            | JsonValue::Array(_)
            | JsonValue::Null => {
                let field_type = self.value_type(&field, value);
                let value = Value::from_json(field_type, value, self.collation)?;
                Ok(Filter::Selector(Selector::new(
                    field,
                    parent,
                    ValueMatcher::eq(value),
                    self.collation,
                )))
            }
        }
    }

    fn resolve_field(&self, name: &str) -> Result<FieldRef> {
        if let Some(found) = self.directory.lookup(name) {
            return Ok(found);
        }

        // try one level up: "parent.child" where only the parent is known
        let unknown = || Error::UnknownField {
            field: name.to_string(),
        };
        let idx = name
            .rfind('.')
            .filter(|&idx| idx > 0 && idx + 1 < name.len())
            .ok_or_else(unknown)?;
        let (parent, _) = self.directory.lookup(&name[..idx]).ok_or_else(unknown)?;

        let field = QueryableField::dynamic(name, &name[idx + 1..], FieldType::Unknown);
        debug!(field = name, parent = parent.name(), "synthesized dynamic field");
        Ok((Arc::new(field), Some(parent)))
    }

    /// Operator object: every operator becomes its own leaf, AND-ed together
    fn parse_operators(
        &self,
        name: &str,
        field: Arc<QueryableField>,
        parent: Option<Arc<QueryableField>>,
        ops: &Map<String, JsonValue>,
    ) -> Result<Filter> {
        let collation = self.operator_collation(ops)?;

        let mut leaves = Vec::with_capacity(ops.len());
        for (key, raw) in ops {
            if key == COLLATION_KEY {
                continue;
            }
            let leaf = if let Some(op) = ComparisonOp::from_key(key) {
                let matcher = self.build_value_matcher(&field, op, raw, collation)?;
                Filter::Selector(Selector::new(
                    Arc::clone(&field),
                    parent.clone(),
                    matcher,
                    collation,
                ))
            } else if let Some(op) = PatternOp::from_key(key) {
                let matcher = build_like_matcher(&field, op, raw, collation)?;
                Filter::Like(LikeFilter::new(Arc::clone(&field), parent.clone(), matcher))
            } else {
                return Err(Error::UnsupportedOperator {
                    operator: key.clone(),
                });
            };
            leaves.push(leaf);
        }

        match leaves.len() {
            0 => Err(Error::EmptyOperator {
                field: name.to_string(),
            }),
            1 => Ok(leaves.remove(0)),
            _ => Ok(Filter::And(AndFilter::from_filters(leaves))),
        }
    }

    /// Collation for one operator object: its own `$collation` or the factory's
    fn operator_collation(&self, ops: &Map<String, JsonValue>) -> Result<Option<Collation>> {
        let Some(raw) = ops.get(COLLATION_KEY) else {
            return Ok(self.collation);
        };
        let collation = CollationRequest::parse(raw)?;
        if self.for_secondary_index && collation.is_case_insensitive() {
            return Err(Error::CaseInsensitiveForbidden);
        }
        Ok(Some(collation))
    }

    fn build_value_matcher(
        &self,
        field: &QueryableField,
        op: ComparisonOp,
        raw: &JsonValue,
        collation: Option<Collation>,
    ) -> Result<ValueMatcher> {
        if raw.is_object() {
            return Err(Error::unsupported_value(format!(
                "'{}' does not accept an object",
                op.key()
            )));
        }
        let field_type = self.value_type(field, raw);
        let collation = if self.for_secondary_index {
            self.collation
        } else {
            collation
        };
        let value = Value::from_json(field_type, raw, collation)?;
        Ok(ValueMatcher::new(op, value))
    }

    /// Type to build a literal as, inferring unknown field types
    fn value_type(&self, field: &QueryableField, raw: &JsonValue) -> FieldType {
        let observed = FieldType::of_json(raw);
        match field.data_type() {
            FieldType::Array => match field.sub_type() {
                Some(sub)
                    if !raw.is_array() && !matches!(sub, FieldType::Array | FieldType::Object) =>
                {
                    sub
                }
                _ => observed,
            },
            FieldType::Unknown => field.infer_type(observed),
            declared => declared,
        }
    }
}

fn build_like_matcher(
    field: &QueryableField,
    op: PatternOp,
    raw: &JsonValue,
    collation: Option<Collation>,
) -> Result<LikeMatcher> {
    let literal = raw.as_str().ok_or_else(|| {
        Error::unsupported_value("string is only supported type for 'regex/contains/not' filters")
    })?;
    field.infer_type(FieldType::String);
    if !field.accepts_patterns() {
        return Err(Error::PatternOnNonString {
            field: field.name().to_string(),
            field_type: field.data_type().name(),
        });
    }
    LikeMatcher::new(op, literal, collation.unwrap_or_default())
}
