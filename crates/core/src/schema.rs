//! Queryable field directory
//!
//! The schema layer hands the filter engine a flat list of
//! [`QueryableField`]s. Each one knows its dotted name, declared type, the
//! element type when it is an array, whether the search index carries it, and
//! which nested fields may be filtered through it (for arrays of objects).
//!
//! ## Type inference
//!
//! A field whose type is [`FieldType::Unknown`] describes itself from the
//! first query that uses it. [`QueryableField::infer_type`] performs that
//! update under a lock and only ever moves a field out of `Unknown`; once set
//! the type never changes again.

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Declared type of a queryable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Not declared; inferred on first use
    Unknown,
    /// Only `null`
    Null,
    /// `true` / `false`
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Double,
    /// UTF-8 string
    String,
    /// Base64-encoded bytes
    Bytes,
    /// UUID in its hyphenated string form
    Uuid,
    /// RFC 3339 timestamp
    DateTime,
    /// JSON array
    Array,
    /// JSON object
    Object,
}

impl FieldType {
    /// Lowercase type name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Unknown => "unknown",
            FieldType::Null => "null",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::Uuid => "uuid",
            FieldType::DateTime => "datetime",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Type implied by the shape of a JSON value
    ///
    /// Every JSON number maps to `Double`.
    pub fn of_json(value: &serde_json::Value) -> FieldType {
        match value {
            serde_json::Value::Null => FieldType::Null,
            serde_json::Value::Bool(_) => FieldType::Bool,
            serde_json::Value::Number(_) => FieldType::Double,
            serde_json::Value::String(_) => FieldType::String,
            serde_json::Value::Array(_) => FieldType::Array,
            serde_json::Value::Object(_) => FieldType::Object,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// QueryableField
// ============================================================================

/// A field that filters may reference
#[derive(Debug)]
pub struct QueryableField {
    /// Full dotted name, e.g. `address.city`
    name: String,
    /// Last path segment, e.g. `city`
    field_name: String,
    data_type: RwLock<FieldType>,
    sub_type: Option<FieldType>,
    search_indexed: bool,
    dynamic: bool,
    allowed_nested: Vec<Arc<QueryableField>>,
}

impl QueryableField {
    /// Create a field of the given type, not indexed in search
    pub fn new(name: impl Into<String>, data_type: FieldType) -> Self {
        let name = name.into();
        let field_name = leaf(&name).to_string();
        QueryableField {
            name,
            field_name,
            data_type: RwLock::new(data_type),
            sub_type: None,
            search_indexed: false,
            dynamic: false,
            allowed_nested: Vec::new(),
        }
    }

    /// Create an array field with the given element type
    pub fn array(name: impl Into<String>, sub_type: FieldType) -> Self {
        QueryableField::new(name, FieldType::Array).with_sub_type(sub_type)
    }

    /// Synthesize a field for a dotted path absent from the schema
    ///
    /// Dynamic fields are never search indexed.
    pub fn dynamic(
        name: impl Into<String>,
        field_name: impl Into<String>,
        data_type: FieldType,
    ) -> Self {
        QueryableField {
            name: name.into(),
            field_name: field_name.into(),
            data_type: RwLock::new(data_type),
            sub_type: None,
            search_indexed: false,
            dynamic: true,
            allowed_nested: Vec::new(),
        }
    }

    /// Set the array element type
    pub fn with_sub_type(mut self, sub_type: FieldType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    /// Mark whether the search index carries this field
    pub fn search_indexed(mut self, indexed: bool) -> Self {
        self.search_indexed = indexed;
        self
    }

    /// Attach nested fields reachable through this one
    pub fn with_nested(mut self, nested: Vec<QueryableField>) -> Self {
        self.allowed_nested = nested.into_iter().map(Arc::new).collect();
        self
    }

    /// Full dotted name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Current type (may still be `Unknown`)
    pub fn data_type(&self) -> FieldType {
        *self.data_type.read()
    }

    /// Element type for arrays
    pub fn sub_type(&self) -> Option<FieldType> {
        self.sub_type
    }

    /// True if the search index carries this field
    pub fn is_search_indexed(&self) -> bool {
        self.search_indexed && !self.dynamic
    }

    /// True for fields synthesized at parse time
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Nested fields reachable through this one
    pub fn allowed_nested(&self) -> &[Arc<QueryableField>] {
        &self.allowed_nested
    }

    /// Path segments from the document root
    pub fn key_path(&self) -> Vec<&str> {
        self.name.split('.').collect()
    }

    /// Path segments relative to `parent`
    ///
    /// Falls back to the leaf name when this field's name does not start
    /// with the parent's.
    pub fn relative_path(&self, parent: &QueryableField) -> Vec<&str> {
        match self
            .name
            .strip_prefix(parent.name())
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(rest) => rest.split('.').collect(),
            None => vec![self.field_name.as_str()],
        }
    }

    /// True if pattern operators (`$regex`, `$contains`, `$not`) apply
    pub fn accepts_patterns(&self) -> bool {
        match self.data_type() {
            FieldType::String => true,
            FieldType::Array => self.sub_type == Some(FieldType::String),
            _ => false,
        }
    }

    /// Record the type observed in a query if this field has none yet
    ///
    /// Returns the field's type after the update. `Null` is never recorded
    /// since it says nothing about the values the field holds.
    pub fn infer_type(&self, observed: FieldType) -> FieldType {
        let guard = self.data_type.upgradable_read();
        if *guard != FieldType::Unknown || matches!(observed, FieldType::Null | FieldType::Unknown)
        {
            return if *guard == FieldType::Unknown {
                observed
            } else {
                *guard
            };
        }

        let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
        *guard = observed;
        debug!(field = %self.name, inferred = %observed, "inferred field type from filter");
        observed
    }
}

fn leaf(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

// ============================================================================
// FieldDirectory
// ============================================================================

/// The set of fields a collection exposes to filters
#[derive(Debug, Default, Clone)]
pub struct FieldDirectory {
    fields: Vec<Arc<QueryableField>>,
}

impl FieldDirectory {
    /// Build a directory from top-level fields
    pub fn new(fields: Vec<QueryableField>) -> Self {
        FieldDirectory {
            fields: fields.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build a directory from already shared fields
    pub fn from_shared(fields: Vec<Arc<QueryableField>>) -> Self {
        FieldDirectory { fields }
    }

    /// All top-level fields
    pub fn fields(&self) -> &[Arc<QueryableField>] {
        &self.fields
    }

    /// Find a field by exact name
    ///
    /// Returns the field and, when it was found in a nested allow-list, the
    /// top-level field it hangs off.
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<(Arc<QueryableField>, Option<Arc<QueryableField>>)> {
        for field in &self.fields {
            if field.name() == name {
                return Some((Arc::clone(field), None));
            }
            if let Some(nested) = field.allowed_nested().iter().find(|n| n.name() == name) {
                return Some((Arc::clone(nested), Some(Arc::clone(field))));
            }
        }
        None
    }
}
