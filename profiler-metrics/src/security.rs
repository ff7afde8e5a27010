//! SQL rendering safety utilities.
//!
//! Every identifier and string literal that reaches a rendered query goes
//! through [`SqlSecurity`]. Identifiers come from catalogs and may contain
//! spaces or non-ASCII characters, so they are quoted rather than restricted
//! to a narrow character set.

use crate::dialect::Dialect;
use crate::error::{ProfilerError, Result};
use regex::Regex;

/// Longest identifier accepted for quoting.
const MAX_IDENTIFIER_LENGTH: usize = 256;

/// Longest regex pattern accepted for pushdown.
const MAX_PATTERN_LENGTH: usize = 1000;

/// SQL identifier and literal validation and escaping utilities.
pub struct SqlSecurity;

impl SqlSecurity {
    /// Validates an identifier (column, table, schema or database name).
    ///
    /// # Examples
    /// ```rust
    /// use profiler_metrics::security::SqlSecurity;
    ///
    /// assert!(SqlSecurity::validate_identifier("customer_id").is_ok());
    /// assert!(SqlSecurity::validate_identifier("客户 名称").is_ok());
    /// assert!(SqlSecurity::validate_identifier("").is_err());
    /// ```
    pub fn validate_identifier(identifier: &str) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(ProfilerError::SecurityError(
                "SQL identifier cannot be empty or whitespace-only".to_string(),
            ));
        }

        if identifier.chars().count() > MAX_IDENTIFIER_LENGTH {
            return Err(ProfilerError::SecurityError(format!(
                "SQL identifier too long (max {MAX_IDENTIFIER_LENGTH} characters)"
            )));
        }

        if identifier.contains('\0') {
            return Err(ProfilerError::SecurityError(
                "SQL identifier cannot contain null bytes".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates and quotes an identifier for the given dialect.
    ///
    /// Embedded quote characters are doubled.
    ///
    /// ```rust
    /// use profiler_metrics::dialect::Dialect;
    /// use profiler_metrics::security::SqlSecurity;
    ///
    /// assert_eq!(SqlSecurity::quote_identifier("id", Dialect::Base).unwrap(), "\"id\"");
    /// assert_eq!(SqlSecurity::quote_identifier("id", Dialect::MySql).unwrap(), "`id`");
    /// ```
    pub fn quote_identifier(identifier: &str, dialect: Dialect) -> Result<String> {
        Self::validate_identifier(identifier)?;
        let quote = dialect.identifier_quote();
        let escaped = identifier.replace(quote, &format!("{quote}{quote}"));
        Ok(format!("{quote}{escaped}{quote}"))
    }

    /// Renders a single-quoted string literal for the given dialect.
    ///
    /// Dialects that process backslash escapes get backslashes doubled so a
    /// regular expression like `\d` reaches the engine unchanged.
    pub fn string_literal(value: &str, dialect: Dialect) -> Result<String> {
        if value.contains('\0') {
            return Err(ProfilerError::SecurityError(
                "SQL literal cannot contain null bytes".to_string(),
            ));
        }

        let escaped = if dialect.processes_backslash_escapes() {
            value.replace('\\', "\\\\").replace('\'', "\\'")
        } else {
            value.replace('\'', "''")
        };
        Ok(format!("'{escaped}'"))
    }

    /// Validates a regex pattern before it is embedded in a query.
    ///
    /// Returns the compiled pattern so callers can reuse it for in-memory
    /// evaluation with identical semantics.
    pub fn validate_regex_pattern(pattern: &str) -> Result<Regex> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(ProfilerError::SecurityError(format!(
                "Regex pattern too long (max {MAX_PATTERN_LENGTH} characters)"
            )));
        }

        if pattern.contains('\0') {
            return Err(ProfilerError::SecurityError(
                "Regex pattern cannot contain null bytes".to_string(),
            ));
        }

        Self::check_redos_patterns(pattern)?;

        Regex::new(pattern)
            .map_err(|e| ProfilerError::SecurityError(format!("Invalid regex pattern: {e}")))
    }

    /// Rejects the classic catastrophic-backtracking shapes.
    ///
    /// The `regex` crate itself is linear-time, but patterns are also pushed
    /// down to backtracking engines.
    fn check_redos_patterns(pattern: &str) -> Result<()> {
        let dangerous_patterns = &["(.*)*", "(.*)+", "(.+)+", "(a+)+", "(a*)*"];

        for dangerous in dangerous_patterns {
            if pattern.contains(dangerous) {
                return Err(ProfilerError::SecurityError(
                    "Regex pattern might cause catastrophic backtracking".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Input validation utilities for numeric configuration values.
pub struct InputValidator;

impl InputValidator {
    /// Validates that a value is finite.
    pub fn validate_threshold(value: f64, name: &str) -> Result<()> {
        if !value.is_finite() {
            return Err(ProfilerError::Configuration(format!(
                "Invalid {name} value: must be finite (not NaN or infinite)"
            )));
        }
        Ok(())
    }

    /// Validates a ratio value (0.0 to 1.0).
    pub fn validate_ratio(value: f64, name: &str) -> Result<()> {
        Self::validate_threshold(value, name)?;

        if !(0.0..=1.0).contains(&value) {
            return Err(ProfilerError::Configuration(format!(
                "Invalid {name} value: must be between 0.0 and 1.0, got {value}"
            )));
        }
        Ok(())
    }
}
