//! Pattern matchers (`$regex`, `$contains`, `$not`)
//!
//! Pattern matchers only apply to string values. They are evaluated in
//! process and have no search-engine rendering.

use regex::{Regex, RegexBuilder};
use sieve_core::{Collation, Error, Result, Value};

/// `$regex`
pub const REGEX: &str = "$regex";
/// `$contains`
pub const CONTAINS: &str = "$contains";
/// `$not`
pub const NOT: &str = "$not";

/// Kind of pattern operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternOp {
    /// Regular expression search
    Regex,
    /// Substring test
    Contains,
    /// Inequality against a literal
    Not,
}

impl PatternOp {
    /// Operator for a filter key, if it is one
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            REGEX => Some(PatternOp::Regex),
            CONTAINS => Some(PatternOp::Contains),
            NOT => Some(PatternOp::Not),
            _ => None,
        }
    }

    /// Filter key for this operator
    pub fn key(&self) -> &'static str {
        match self {
            PatternOp::Regex => REGEX,
            PatternOp::Contains => CONTAINS,
            PatternOp::Not => NOT,
        }
    }
}

/// Pattern bound to a literal and a collation
#[derive(Debug, Clone)]
pub enum LikeMatcher {
    /// Compiled regular expression
    Regex {
        /// Compiled form of `pattern`
        regex: Regex,
        /// Pattern as supplied
        pattern: String,
    },
    /// Collation-aware substring test
    Contains {
        /// Substring to look for
        needle: String,
        /// Collation of the test
        collation: Collation,
    },
    /// Collation-aware inequality
    Not {
        /// Literal the value must differ from
        literal: String,
        /// Collation of the test
        collation: Collation,
    },
}

impl LikeMatcher {
    /// Build a matcher, compiling regex patterns up front
    ///
    /// A case-insensitive collation makes the regex case insensitive.
    pub fn new(op: PatternOp, literal: &str, collation: Collation) -> Result<Self> {
        match op {
            PatternOp::Regex => {
                let regex = RegexBuilder::new(literal)
                    .case_insensitive(collation.is_case_insensitive())
                    .build()
                    .map_err(|e| Error::InvalidRegex {
                        pattern: literal.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(LikeMatcher::Regex {
                    regex,
                    pattern: literal.to_string(),
                })
            }
            PatternOp::Contains => Ok(LikeMatcher::Contains {
                needle: literal.to_string(),
                collation,
            }),
            PatternOp::Not => Ok(LikeMatcher::Not {
                literal: literal.to_string(),
                collation,
            }),
        }
    }

    /// The operator
    pub fn op(&self) -> PatternOp {
        match self {
            LikeMatcher::Regex { .. } => PatternOp::Regex,
            LikeMatcher::Contains { .. } => PatternOp::Contains,
            LikeMatcher::Not { .. } => PatternOp::Not,
        }
    }

    /// Test a single (non-array) value
    ///
    /// `$regex` and `$contains` need a string. `$not` holds for anything that
    /// is not a string equal to the literal, including null.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            LikeMatcher::Regex { regex, .. } => doc.as_str().is_some_and(|s| regex.is_match(s)),
            LikeMatcher::Contains { needle, collation } => doc
                .as_str()
                .is_some_and(|s| collation.contains(s, needle)),
            LikeMatcher::Not { literal, collation } => {
                !doc.as_str().is_some_and(|s| collation.equals(s, literal))
            }
        }
    }
}
