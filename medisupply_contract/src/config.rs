//! # Validation Configuration

use std::env;

/// Controls how shapes are checked
///
/// Strict mode rejects fields that a shape does not declare. When
/// `collect_all_issues` is off, a validation error carries only the first
/// failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Reject undeclared object fields
    pub strict: bool,

    /// Report every failing field instead of only the first one
    pub collect_all_issues: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: true,
            collect_all_issues: false,
        }
    }
}

impl ValidationConfig {
    /// Defaults overridden by `MEDISUPPLY_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            strict: env::var(env_vars::STRICT)
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.strict),
            collect_all_issues: env::var(env_vars::COLLECT_ALL_ISSUES)
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.collect_all_issues),
        }
    }

    /// Accept undeclared object fields
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_all_issues(mut self) -> Self {
        self.collect_all_issues = true;
        self
    }
}

/// Parse boolean flag from string (used for environment variables)
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const STRICT: &str = "MEDISUPPLY_STRICT";
    pub const COLLECT_ALL_ISSUES: &str = "MEDISUPPLY_COLLECT_ALL_ISSUES";
}
