//! Error types for csh2sh
//!
//! [`ConvertError`] is the typed error every conversion returns. An
//! [`ErrorReport`] renders one as either human-readable text or structured
//! JSON for the command-line harness.

pub mod help_db;

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while selecting a converter or converting a script
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input file name does not carry the expected extension
    #[error("Expected a .{expected} file: {}", path.display())]
    InvalidInput {
        path: PathBuf,
        expected: &'static str,
    },

    /// The input file does not exist
    #[error("Input file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading the source or writing the destination failed
    #[error("I/O error while converting {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No converter accepts the input's extension
    #[error("No available converters for {input}")]
    NoConverter { input: String },

    /// A converter accepts the extension, but not for this target kind
    #[error("No conversion from {extension} to {target}")]
    UnsupportedTarget { extension: String, target: String },

    /// The same (extension, target) pair was registered twice
    #[error("Converter already registered for {extension} -> {target}")]
    DuplicateConverter { extension: String, target: String },

    /// A registration key is malformed
    #[error("Invalid converter registration: {reason}")]
    InvalidRegistration { reason: String },

    /// Recursive conversion was given something other than a directory
    #[error("Not a valid directory: {}", path.display())]
    NotADirectory { path: PathBuf },
}

impl ConvertError {
    /// Wrap an I/O error with the path being converted
    pub fn io(path: &Path, source: io::Error) -> Self {
        ConvertError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable error code, used for help lookup and JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ConvertError::InvalidInput { .. } => "INVALID_INPUT",
            ConvertError::NotFound { .. } => "FILE_NOT_FOUND",
            ConvertError::Io { .. } => "IO_FAILURE",
            ConvertError::NoConverter { .. } => "NO_CONVERTER",
            ConvertError::UnsupportedTarget { .. } => "UNSUPPORTED_TARGET",
            ConvertError::DuplicateConverter { .. } => "DUPLICATE_CONVERTER",
            ConvertError::InvalidRegistration { .. } => "INVALID_REGISTRATION",
            ConvertError::NotADirectory { .. } => "NOT_A_DIRECTORY",
        }
    }

    /// Process exit code the command-line harness uses for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::NotFound { .. } | ConvertError::Io { .. } => 1,
            ConvertError::InvalidInput { .. }
            | ConvertError::NoConverter { .. }
            | ConvertError::UnsupportedTarget { .. }
            | ConvertError::NotADirectory { .. } => 2,
            // Registry misconfiguration is an internal software error
            ConvertError::DuplicateConverter { .. }
            | ConvertError::InvalidRegistration { .. } => 70,
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConvertError::InvalidInput { path, .. }
            | ConvertError::NotFound { path }
            | ConvertError::Io { path, .. }
            | ConvertError::NotADirectory { path } => Some(path),
            _ => None,
        }
    }

    /// Build a serializable report for display
    pub fn report(&self) -> ErrorReport {
        let mut report = ErrorReport::new(self.error_code(), self.to_string(), self.exit_code());
        if let Some(path) = self.path() {
            report = report.with_context(serde_json::json!({ "path": path.display().to_string() }));
        }
        report
    }
}

/// Structured, printable form of a [`ConvertError`]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Error code category
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Exit code for the process
    pub exit_code: i32,
    /// Additional context information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ErrorReport {
    /// Create a new report with the given code, message, and exit code
    pub fn new(error_code: impl Into<String>, message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            exit_code,
            context: None,
        }
    }

    /// Add context information to the report
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Format report as JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error_code":"{}","message":"{}","exit_code":{}}}"#,
                self.error_code, self.message, self.exit_code
            )
        })
    }

    /// Format report as human-readable text
    pub fn to_text(&self) -> String {
        self.message.clone()
    }

    /// Get help text for this error code, if available
    pub fn get_help(&self) -> Option<&'static help_db::HelpEntry> {
        help_db::get_help(&self.error_code)
    }

    /// Format report with help text appended
    pub fn with_help(&self) -> String {
        let mut output = self.to_text();
        if let Some(help) = self.get_help() {
            output.push_str("\n\n");
            output.push_str("Help: ");
            output.push_str(help.title);
            output.push('\n');
            output.push_str(help.fix);
        }
        output
    }
}
