//! String collation
//!
//! A [`Collation`] decides how two strings compare: byte-wise (case
//! sensitive) or after lowercasing both sides (case insensitive). Requests
//! can ask for one through a `$collation` object:
//!
//! ```json
//! {"name": {"$eq": "alice", "$collation": {"case": "ci"}}}
//! ```
//!
//! Secondary index scans always use the sort-key collation, which is case
//! sensitive and byte ordered so that it agrees with encoded index keys.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Key under which a comparison object carries its collation
pub const COLLATION_KEY: &str = "$collation";

/// Case handling of a collation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Case {
    /// `"cs"`
    #[default]
    Sensitive,
    /// `"ci"`
    Insensitive,
}

impl Case {
    /// Parse the wire form (`"cs"` / `"ci"`)
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "cs" => Ok(Case::Sensitive),
            "ci" => Ok(Case::Insensitive),
            other => Err(Error::InvalidCollation {
                reason: format!("case '{}' is not supported, expected 'ci' or 'cs'", other),
            }),
        }
    }
}

/// String comparison policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Collation {
    case: Case,
    sort_key: bool,
}

impl Collation {
    /// Byte-wise comparison
    pub const fn case_sensitive() -> Self {
        Collation {
            case: Case::Sensitive,
            sort_key: false,
        }
    }

    /// Comparison after lowercasing both sides
    pub const fn case_insensitive() -> Self {
        Collation {
            case: Case::Insensitive,
            sort_key: false,
        }
    }

    /// Collation matching the ordering of encoded secondary index keys
    pub const fn sort_key() -> Self {
        Collation {
            case: Case::Sensitive,
            sort_key: true,
        }
    }

    /// Collation with the given case handling
    pub const fn with_case(case: Case) -> Self {
        Collation {
            case,
            sort_key: false,
        }
    }

    /// Case handling of this collation
    pub fn case(&self) -> Case {
        self.case
    }

    /// True for `"ci"` collations
    pub fn is_case_insensitive(&self) -> bool {
        self.case == Case::Insensitive
    }

    /// True for the secondary index collation
    pub fn is_sort_key(&self) -> bool {
        self.sort_key
    }

    /// Order two strings under this collation
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self.case {
            Case::Sensitive => a.cmp(b),
            Case::Insensitive => folded(a).cmp(folded(b)),
        }
    }

    /// Equality under this collation
    pub fn equals(&self, a: &str, b: &str) -> bool {
        match self.case {
            Case::Sensitive => a == b,
            Case::Insensitive => folded(a).eq(folded(b)),
        }
    }

    /// Substring test under this collation
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        match self.case {
            Case::Sensitive => haystack.contains(needle),
            Case::Insensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

// ============================================================================
// Request form
// ============================================================================

/// Collation object as sent by clients
///
/// Accepts either `{"case": "ci"}` or `{"case_insensitive": true}`.
/// Unrecognised keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationRequest {
    /// `"ci"` or `"cs"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    /// Boolean form of `case`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

impl CollationRequest {
    /// Check the request and resolve it to a collation
    pub fn validate(&self) -> Result<Collation> {
        let from_case = self.case.as_deref().map(Case::parse).transpose()?;
        let from_flag = self.case_insensitive.map(|ci| {
            if ci {
                Case::Insensitive
            } else {
                Case::Sensitive
            }
        });

        let case = match (from_case, from_flag) {
            (Some(a), Some(b)) if a != b => {
                return Err(Error::InvalidCollation {
                    reason: "'case' and 'case_insensitive' disagree".to_string(),
                })
            }
            (Some(case), _) | (None, Some(case)) => case,
            (None, None) => Case::Sensitive,
        };

        Ok(Collation::with_case(case))
    }

    /// Decode and validate a raw `$collation` value
    pub fn parse(raw: &serde_json::Value) -> Result<Collation> {
        if !raw.is_object() {
            return Err(Error::InvalidCollation {
                reason: "collation must be an object".to_string(),
            });
        }
        let request: CollationRequest =
            serde_json::from_value(raw.clone()).map_err(|e| Error::InvalidCollation {
                reason: e.to_string(),
            })?;
        request.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_sensitive_compare() {
        let c = Collation::case_sensitive();
        assert_eq!(c.compare("A", "a"), Ordering::Less);
        assert!(!c.equals("Alice", "alice"));
        assert!(c.equals("alice", "alice"));
    }

    #[test]
    fn test_case_insensitive_compare() {
        let c = Collation::case_insensitive();
        assert_eq!(c.compare("ALICE", "alice"), Ordering::Equal);
        assert_eq!(c.compare("b", "A"), Ordering::Greater);
        assert!(c.equals("Straße", "STRAßE"));
    }

    #[test]
    fn test_contains() {
        assert!(Collation::case_sensitive().contains("hello world", "lo w"));
        assert!(!Collation::case_sensitive().contains("Hello", "hello"));
        assert!(Collation::case_insensitive().contains("Hello World", "WORLD"));
    }

    #[test]
    fn test_sort_key_is_case_sensitive() {
        let c = Collation::sort_key();
        assert!(c.is_sort_key());
        assert!(!c.is_case_insensitive());
        assert_eq!(c.compare("B", "a"), Ordering::Less);
    }

    #[test]
    fn test_parse_case_string() {
        let c = CollationRequest::parse(&json!({"case": "ci"})).unwrap();
        assert!(c.is_case_insensitive());
        let c = CollationRequest::parse(&json!({"case": "cs"})).unwrap();
        assert!(!c.is_case_insensitive());
    }

    #[test]
    fn test_parse_case_flag() {
        let c = CollationRequest::parse(&json!({"case_insensitive": true})).unwrap();
        assert!(c.is_case_insensitive());
    }

    #[test]
    fn test_parse_rejects_unknown_case() {
        let err = CollationRequest::parse(&json!({"case": "xx"})).unwrap_err();
        assert!(matches!(err, Error::InvalidCollation { .. }));
    }

    #[test]
    fn test_parse_rejects_conflict() {
        let err =
            CollationRequest::parse(&json!({"case": "cs", "case_insensitive": true})).unwrap_err();
        assert!(matches!(err, Error::InvalidCollation { .. }));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(CollationRequest::parse(&json!("ci")).is_err());
        assert!(CollationRequest::parse(&json!({"case": 1})).is_err());
    }

    #[test]
    fn test_empty_request_is_case_sensitive() {
        let c = CollationRequest::parse(&json!({})).unwrap();
        assert_eq!(c, Collation::case_sensitive());
    }
}
