//! Value matchers
//!
//! A [`ValueMatcher`] binds one comparison operator to one target value and
//! answers whether a document value satisfies it. Ordering comes from
//! [`Value::compare`]; values that cannot be compared never match.

use sieve_core::Value;
use std::cmp::Ordering;

/// `$eq`
pub const EQ: &str = "$eq";
/// `$gt`
pub const GT: &str = "$gt";
/// `$gte`
pub const GTE: &str = "$gte";
/// `$lt`
pub const LT: &str = "$lt";
/// `$lte`
pub const LTE: &str = "$lte";

/// Comparison operator of a value matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equal
    Eq,
    /// Strictly greater
    Gt,
    /// Greater or equal
    Gte,
    /// Strictly less
    Lt,
    /// Less or equal
    Lte,
}

impl ComparisonOp {
    /// Operator for a filter key, if it is one
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            EQ => Some(ComparisonOp::Eq),
            GT => Some(ComparisonOp::Gt),
            GTE => Some(ComparisonOp::Gte),
            LT => Some(ComparisonOp::Lt),
            LTE => Some(ComparisonOp::Lte),
            _ => None,
        }
    }

    /// Filter key for this operator
    pub fn key(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => EQ,
            ComparisonOp::Gt => GT,
            ComparisonOp::Gte => GTE,
            ComparisonOp::Lt => LT,
            ComparisonOp::Lte => LTE,
        }
    }

    fn accepts(&self, ord: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ord == Ordering::Equal,
            ComparisonOp::Gt => ord == Ordering::Greater,
            ComparisonOp::Gte => ord != Ordering::Less,
            ComparisonOp::Lt => ord == Ordering::Less,
            ComparisonOp::Lte => ord != Ordering::Greater,
        }
    }
}

/// One comparison bound to one value
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMatcher {
    op: ComparisonOp,
    value: Value,
}

impl ValueMatcher {
    /// Create a matcher
    pub fn new(op: ComparisonOp, value: Value) -> Self {
        ValueMatcher { op, value }
    }

    /// Equality matcher
    pub fn eq(value: Value) -> Self {
        ValueMatcher::new(ComparisonOp::Eq, value)
    }

    /// The operator
    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    /// The bound value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// True if `doc` compared to the bound value satisfies the operator
    pub fn matches(&self, doc: &Value) -> bool {
        doc.compare(&self.value)
            .is_some_and(|ord| self.op.accepts(ord))
    }
}
