//! Continent label normalization and table naming.
//!
//! Normalized labels double as lookup keys in the continent table and as
//! fragments of detail table names, so the same function must run on both
//! the write path and the lookup path.

use crate::error::{Result, SyncError};

/// Table prefix used when the configuration does not set one
pub const DEFAULT_PREFIX: &str = "owid_";

/// Normalize a continent or location label.
///
/// Trims, lowercases, turns whitespace into `_` and drops anything outside
/// `[a-z0-9_]`. Idempotent, so `"North America"` and `"north_america"` give
/// the same key.
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

fn is_identifier_fragment(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Accept `s` only if it is a non-empty `[a-z0-9_]+` string
pub fn validate_identifier(s: &str) -> Result<&str> {
    if !s.is_empty() && is_identifier_fragment(s) {
        Ok(s)
    } else {
        Err(SyncError::InvalidIdentifier(s.to_string()))
    }
}

/// Prefixed names of every table the sync writes to
#[derive(Debug, Clone, PartialEq)]
pub struct TableNames {
    prefix: String,
}

impl TableNames {
    /// `prefix` is empty or `[a-z_][a-z0-9_]*`, so every name it starts is
    /// a valid unquoted identifier
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let leading_ok = prefix
            .chars()
            .next()
            .map_or(true, |c| c.is_ascii_lowercase() || c == '_');
        if !leading_ok || !is_identifier_fragment(&prefix) {
            return Err(SyncError::InvalidIdentifier(prefix));
        }
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The continent table
    pub fn areas(&self) -> String {
        format!("{}areas", self.prefix)
    }

    pub fn locations(&self) -> String {
        format!("{}locations", self.prefix)
    }

    /// Detail table for an already-normalized continent name
    pub fn details(&self, continent: &str) -> Result<String> {
        let continent = validate_identifier(continent)?;
        Ok(format!("{}details_{}", self.prefix, continent))
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}
