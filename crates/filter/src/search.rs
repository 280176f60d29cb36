//! Search-engine filter syntax
//!
//! Comparisons render as `field:=value`, `field:>value` and so on. Strings
//! are wrapped in backticks, timestamps as Unix nanoseconds. Conjunctions
//! join with `&&`, disjunctions with `||`, and a nested conjunction or
//! disjunction is wrapped in parentheses.
//!
//! Anything that has no rendering keeps the enclosing filter out of the
//! search engine: null, objects, raw bytes, strings holding a backtick,
//! arrays, and range comparisons on booleans. The engine reads `:=[a,b]` as
//! "any of", which is not the whole-array equality evaluated in process.

use crate::matcher::ComparisonOp;
use sieve_core::Value;

/// Logical AND token
pub const AND_TOKEN: &str = "&&";
/// Logical OR token
pub const OR_TOKEN: &str = "||";

fn op_token(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Eq => ":=",
        ComparisonOp::Gt => ":>",
        ComparisonOp::Gte => ":>=",
        ComparisonOp::Lt => ":<",
        ComparisonOp::Lte => ":<=",
    }
}

/// Search literal for a value, if it has one
pub fn render_literal(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) | Value::Bytes(_) | Value::Array(_) => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Double(d) => Some(d.to_string()),
        Value::String(s) => {
            let s = s.as_str();
            if s.contains('`') {
                None
            } else {
                Some(format!("`{}`", s))
            }
        }
        Value::Uuid(u) => Some(format!("`{}`", u)),
        Value::DateTime(dt) => dt.timestamp_nanos_opt().map(|n| n.to_string()),
    }
}

/// `field OP literal`, if the value renders
///
/// Booleans only render under `$eq`.
pub fn render_comparison(field: &str, op: ComparisonOp, value: &Value) -> Option<String> {
    if op != ComparisonOp::Eq && matches!(value, Value::Bool(_)) {
        return None;
    }
    render_literal(value).map(|literal| format!("{}{}{}", field, op_token(op), literal))
}

/// Join child filter strings with `token`
///
/// Children that are themselves joins come in already parenthesized.
pub fn join(parts: &[String], token: &str) -> String {
    parts.join(token)
}

/// Wrap a joined filter for embedding in a larger join
pub fn group(part: &str) -> String {
    format!("({})", part)
}
