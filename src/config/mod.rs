//! Configuration parsing from .csh2shrc
//!
//! Recognised settings:
//! - CSH2SH_HEADER (interpreter line written first, default `#!/bin/bash`)
//! - CSH2SH_ERROR_FORMAT (text, json)
//! - CSH2SH_COLOR (auto, always, never)
//! - CSH2SH_REVIEW (true/false, print review notes after converting)
//!
//! Environment variables with the same names override the file.

use crate::transpile::DEFAULT_HEADER;
use std::fs;
use std::path::{Path, PathBuf};

/// How errors are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorFormat {
    #[default]
    Text,
    Json,
}

impl ErrorFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => ErrorFormat::Json,
            _ => ErrorFormat::Text,
        }
    }
}

/// When to color terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "always" => ColorMode::Always,
            "never" => ColorMode::Never,
            _ => ColorMode::Auto,
        }
    }

    /// Resolve against whether the output stream is a terminal
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_terminal,
        }
    }
}

/// Complete csh2sh configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub header: String,
    pub error_format: ErrorFormat,
    pub color: ColorMode,
    pub review: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            error_format: ErrorFormat::default(),
            color: ColorMode::default(),
            review: false,
        }
    }
}

impl Config {
    /// Load ~/.csh2shrc, then apply environment overrides
    pub fn load() -> Self {
        let path = Self::rc_path();
        let mut config = Self::from_file(&path).unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Get the path to .csh2shrc
    pub fn rc_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".csh2shrc")
    }

    /// Parse configuration from a specific file
    pub fn from_file(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Some(Self::parse(&content))
    }

    /// Parse configuration from content string
    pub fn parse(content: &str) -> Self {
        let mut config = Config::default();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            if let Some((key, value)) = parse_assignment(line) {
                config.set(&key, &unquote(&value));
            }
        }

        config
    }

    /// Apply overrides from a lookup function (the environment, in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["CSH2SH_HEADER", "CSH2SH_ERROR_FORMAT", "CSH2SH_COLOR", "CSH2SH_REVIEW"] {
            if let Some(value) = lookup(key) {
                self.set(key, &value);
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match key {
            "CSH2SH_HEADER" => {
                if value.starts_with("#!") {
                    self.header = value.to_string();
                } else {
                    tracing::warn!(%value, "ignoring CSH2SH_HEADER that is not a #! line");
                }
            }
            "CSH2SH_ERROR_FORMAT" => self.error_format = ErrorFormat::from_str(value),
            "CSH2SH_COLOR" => self.color = ColorMode::from_str(value),
            "CSH2SH_REVIEW" => {
                self.review = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
            }
            _ => {}
        }
    }
}

/// Parse a shell variable assignment (KEY=value or KEY="value")
fn parse_assignment(line: &str) -> Option<(String, String)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim().to_string();
    let value = line[eq_pos + 1..].trim().to_string();

    if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    Some((key, value))
}

/// Remove surrounding quotes from a value
fn unquote(s: &str) -> String {
    let s = s.trim();

    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        return s[1..s.len() - 1].to_string();
    }

    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        return s[1..s.len() - 1].to_string();
    }

    s.to_string()
}
