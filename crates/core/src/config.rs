//! Filter engine configuration via `sieve.toml`
//!
//! The request-level default collation and the nesting limit for `$and` /
//! `$or` are read from a small TOML file. A missing file means defaults.

use crate::collation::{Case, Collation};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "sieve.toml";

/// Default maximum `$and`/`$or` nesting depth
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Filter engine configuration loaded from `sieve.toml`.
///
/// # Example
///
/// ```toml
/// # Default string collation: "cs" or "ci". Omit for case sensitive.
/// case = "ci"
///
/// # Maximum $and/$or nesting depth
/// max_nesting_depth = 32
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Default collation case: `"cs"` or `"ci"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    /// Maximum `$and`/`$or` nesting depth.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            case: None,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl FilterConfig {
    /// Request-level default collation, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if `case` is not `"cs"` or `"ci"`.
    pub fn collation(&self) -> Result<Option<Collation>> {
        match self.case.as_deref() {
            None => Ok(None),
            Some(raw) => Case::parse(raw)
                .map(|case| Some(Collation::with_case(case)))
                .map_err(|e| Error::Config {
                    reason: format!("invalid case in {}: {}", CONFIG_FILE_NAME, e),
                }),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Sieve filter engine configuration
#
# Default string collation for filters: "cs" (case sensitive) or "ci".
# Omit to compare strings byte-wise unless a request says otherwise.
# case = "cs"

# Maximum nesting depth of $and / $or clauses
max_nesting_depth = 32
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FilterConfig = toml::from_str(content).map_err(|e| Error::Config {
            reason: format!("failed to parse {}: {}", CONFIG_FILE_NAME, e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Config {
                reason: format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(Error::Config {
                reason: "max_nesting_depth must be at least 1".to_string(),
            });
        }
        self.collation()?;
        Ok(())
    }
}
