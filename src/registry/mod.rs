//! Converter selection by (input extension, target kind)
//!
//! The registry is a static table of factories. Lookups are
//! case-insensitive on both keys, and `validate` lets a caller fail fast at
//! startup if the table is malformed.

use crate::error::ConvertError;
use crate::transpile::{ScriptTranspiler, DEFAULT_HEADER, SOURCE_EXTENSION, TARGET_EXTENSION};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A file conversion capability
pub trait Converter {
    /// Short identifier for logs and messages
    fn name(&self) -> &'static str;

    /// Convert `input`, returning the path of the file produced
    fn convert(&self, input: &Path) -> Result<PathBuf, ConvertError>;
}

/// Settings handed to a factory when a converter is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Interpreter line for generated scripts
    pub header: String,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

/// Builds a fresh converter for each lookup
pub type ConverterFactory = fn(&ConverterOptions) -> Box<dyn Converter>;

/// Maps `(extension, target kind)` to a converter factory
#[derive(Default)]
pub struct ConverterRegistry {
    converters: BTreeMap<String, BTreeMap<String, ConverterFactory>>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("pairs", &self.pairs())
            .finish()
    }
}

fn csh_to_sh(options: &ConverterOptions) -> Box<dyn Converter> {
    Box::new(ScriptTranspiler::new().with_header(options.header.clone()))
}

/// Converters every registry starts with, as `(extension, target, factory)`
pub const BUILTIN: &[(&str, &str, ConverterFactory)] =
    &[(SOURCE_EXTENSION, TARGET_EXTENSION, csh_to_sh)];

impl ConverterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in converter
    ///
    /// Keys come from [`BUILTIN`] as written; [`validate`](Self::validate)
    /// checks them.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &(extension, target, factory) in BUILTIN {
            registry
                .converters
                .entry(extension.to_string())
                .or_default()
                .insert(target.to_string(), factory);
        }
        registry
    }

    /// Register a converter for an input extension and target kind
    ///
    /// Keys are stored lowercased; a leading dot on the extension is ignored.
    pub fn register(
        &mut self,
        extension: &str,
        target: &str,
        factory: ConverterFactory,
    ) -> Result<(), ConvertError> {
        let extension = normalize_key(extension);
        let target = normalize_key(target);
        check_key(&extension, "extension")?;
        check_key(&target, "target kind")?;

        let targets = self.converters.entry(extension.clone()).or_default();
        if targets.contains_key(&target) {
            return Err(ConvertError::DuplicateConverter { extension, target });
        }
        tracing::debug!(%extension, %target, "registered converter");
        targets.insert(target, factory);
        Ok(())
    }

    /// Check the table is usable
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.converters.values().all(|targets| targets.is_empty()) {
            return Err(ConvertError::InvalidRegistration {
                reason: "no converters registered".to_string(),
            });
        }
        for (extension, targets) in &self.converters {
            check_key(extension, "extension")?;
            for target in targets.keys() {
                check_key(target, "target kind")?;
            }
        }
        Ok(())
    }

    /// Find the converter for `input` and `target` with default options
    ///
    /// # Errors
    ///
    /// `NoConverter` if nothing handles the input's extension,
    /// `UnsupportedTarget` if the extension is known but the target is not.
    pub fn lookup(&self, input: &Path, target: &str) -> Result<Box<dyn Converter>, ConvertError> {
        self.lookup_with(input, target, &ConverterOptions::default())
    }

    /// Like [`lookup`](Self::lookup), building the converter with `options`
    pub fn lookup_with(
        &self,
        input: &Path,
        target: &str,
        options: &ConverterOptions,
    ) -> Result<Box<dyn Converter>, ConvertError> {
        let extension = input
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ConvertError::NoConverter {
                input: input.display().to_string(),
            })?;

        self.resolve(extension, target, options).map_err(|e| match e {
            ConvertError::NoConverter { .. } => ConvertError::NoConverter {
                input: input.display().to_string(),
            },
            other => other,
        })
    }

    /// Build the converter registered for `extension` and `target`
    pub fn resolve(
        &self,
        extension: &str,
        target: &str,
        options: &ConverterOptions,
    ) -> Result<Box<dyn Converter>, ConvertError> {
        let extension = normalize_key(extension);
        let targets = self
            .converters
            .get(&extension)
            .ok_or_else(|| ConvertError::NoConverter {
                input: format!("*.{}", extension),
            })?;

        let target = normalize_key(target);
        match targets.get(&target) {
            Some(factory) => {
                tracing::debug!(%extension, %target, "resolved converter");
                Ok(factory(options))
            }
            None => Err(ConvertError::UnsupportedTarget { extension, target }),
        }
    }

    /// All registered `(extension, target)` pairs, sorted
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.converters
            .iter()
            .flat_map(|(ext, targets)| targets.keys().map(move |t| (ext.clone(), t.clone())))
            .collect()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches('.').to_lowercase()
}

fn check_key(key: &str, what: &str) -> Result<(), ConvertError> {
    if key.is_empty() {
        return Err(ConvertError::InvalidRegistration {
            reason: format!("empty {}", what),
        });
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(ConvertError::InvalidRegistration {
            reason: format!("{} '{}' contains invalid characters", what, key),
        });
    }
    Ok(())
}
