//! Field extraction from documents
//!
//! Paths descend through objects by key. An array met before the path is
//! exhausted fans out over its object elements, so `items.name` against
//! `{"items": [{"name": "a"}, {"name": "b"}]}` yields both names.

use serde_json::{Map, Value as JsonValue};
use sieve_core::QueryableField;

type Document = Map<String, JsonValue>;

/// Values at `path` below `root`
pub(crate) fn values_at<'a>(root: &'a JsonValue, path: &[&str], out: &mut Vec<&'a JsonValue>) {
    let Some((head, rest)) = path.split_first() else {
        out.push(root);
        return;
    };
    match root {
        JsonValue::Object(map) => {
            if let Some(next) = map.get(*head) {
                values_at(next, rest, out);
            }
        }
        JsonValue::Array(items) => {
            for item in items.iter().filter(|item| item.is_object()) {
                values_at(item, path, out);
            }
        }
        _ => {}
    }
}

fn values_in_doc<'a>(doc: &'a Document, path: &[&str], out: &mut Vec<&'a JsonValue>) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    if let Some(next) = doc.get(*head) {
        values_at(next, rest, out);
    }
}

/// Raw values a filter on `field` should test
///
/// With a parent, the parent is extracted first and the field is read from
/// each of its values. An empty result means the field is absent.
pub(crate) fn candidates<'a>(
    doc: &'a Document,
    field: &QueryableField,
    parent: Option<&QueryableField>,
) -> Vec<&'a JsonValue> {
    let mut out = Vec::new();
    match parent {
        Some(parent) => {
            let mut parents = Vec::new();
            values_in_doc(doc, &parent.key_path(), &mut parents);
            let relative = field.relative_path(parent);
            for value in parents {
                values_at(value, &relative, &mut out);
            }
        }
        None => values_in_doc(doc, &field.key_path(), &mut out),
    }
    out
}
