//! Run-wide planning options.
//!
//! Options are built in code with the consuming setters below, or read from
//! the environment with [`Options::from_env`]:
//!
//! - `REDACT_PLAN_FAIL_FAST`: `1`/`true`/`yes` or `0`/`false`/`no`.
//! - `REDACT_PLAN_RUNTIME_IMPORT`: Go import path of the redaction runtime.

use thiserror::Error;

use crate::service::StatusCode;

pub const FAIL_FAST_ENV: &str = "REDACT_PLAN_FAIL_FAST";
pub const RUNTIME_IMPORT_ENV: &str = "REDACT_PLAN_RUNTIME_IMPORT";

/// Error message for internal methods that set none, with `%service%` and
/// `%method%` placeholders.
pub const DEFAULT_ERROR_TEMPLATE: &str =
    "Permission Denied. Method: \"%service%.%method%\" has been redacted";

pub const DEFAULT_RUNTIME_IMPORT: &str = "github.com/menta2k/protoc-gen-redact/v3/redact/v3";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be one of 1, true, yes, 0, false, no (got `{value}`)")]
    InvalidFlag { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub(crate) fail_fast: bool,
    pub(crate) default_status_code: StatusCode,
    pub(crate) default_error_template: String,
    pub(crate) runtime_import: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fail_fast: false,
            default_status_code: StatusCode::PermissionDenied,
            default_error_template: DEFAULT_ERROR_TEMPLATE.to_string(),
            runtime_import: DEFAULT_RUNTIME_IMPORT.to_string(),
        }
    }
}

impl Options {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(value) = lookup(FAIL_FAST_ENV) {
            options.fail_fast = parse_flag(FAIL_FAST_ENV, &value)?;
        }
        if let Some(value) = lookup(RUNTIME_IMPORT_ENV) {
            let value = value.trim();
            if value.is_empty() {
                return Err(ConfigError::Empty {
                    var: RUNTIME_IMPORT_ENV,
                });
            }
            options.runtime_import = value.to_string();
        }
        Ok(options)
    }

    /// Stop a file at its first failing message or service.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Status code for internal methods when neither the method nor its
    /// service sets one.
    #[must_use]
    pub fn with_default_status_code(mut self, code: StatusCode) -> Self {
        self.default_status_code = code;
        self
    }

    #[must_use]
    pub fn with_default_error_template(mut self, template: impl Into<String>) -> Self {
        self.default_error_template = template.into();
        self
    }

    #[must_use]
    pub fn with_runtime_import(mut self, path: impl Into<String>) -> Self {
        self.runtime_import = path.into();
        self
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn default_status_code(&self) -> StatusCode {
        self.default_status_code
    }

    pub fn default_error_template(&self) -> &str {
        &self.default_error_template
    }

    pub fn runtime_import(&self) -> &str {
        &self.runtime_import
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Err(ConfigError::Empty { var }),
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
