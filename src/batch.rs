//! Directory-tree conversion
//!
//! Walks a directory and converts every C-shell script found. A failure on
//! one file, or an entry the walk cannot read, is recorded and the walk
//! continues.

use crate::error::ConvertError;
use crate::registry::Converter;
use crate::transpile::has_source_extension;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into
pub const EXCLUDED_DIRS: &[&str] = &["target", ".git", ".svn", "node_modules", "build", "out"];

/// Outcome of a tree conversion
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Scripts converted, as `(input, output)`
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Scripts that failed to convert and entries that could not be read
    pub failed: Vec<(PathBuf, ConvertError)>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// List the scripts under `root` that would be converted, in sorted order
///
/// Entries that cannot be read are logged and skipped.
pub fn find_scripts(root: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let (scripts, unreadable) = walk(root)?;
    for (path, e) in unreadable {
        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
    }
    Ok(scripts)
}

/// Convert every script under `root` with `converter`
///
/// Only a root that is not a directory fails the whole run. Unreadable
/// entries and failed conversions are recorded in the summary.
pub fn convert_tree(root: &Path, converter: &dyn Converter) -> Result<BatchSummary, ConvertError> {
    let (scripts, unreadable) = walk(root)?;
    let mut summary = BatchSummary::default();

    for (path, e) in unreadable {
        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
        summary.failed.push((path, e));
    }

    for script in scripts {
        match converter.convert(&script) {
            Ok(output) => {
                tracing::info!(input = %script.display(), output = %output.display(), "converted");
                summary.converted.push((script, output));
            }
            Err(e) => {
                tracing::warn!(input = %script.display(), error = %e, "conversion failed");
                summary.failed.push((script, e));
            }
        }
    }

    Ok(summary)
}

type Walked = (Vec<PathBuf>, Vec<(PathBuf, ConvertError)>);

fn walk(root: &Path) -> Result<Walked, ConvertError> {
    if !root.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut scripts = Vec::new();
    let mut unreadable = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && has_source_extension(entry.path()) {
                    scripts.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                unreadable.push((path.clone(), ConvertError::Io { path, source }));
            }
        }
    }
    Ok((scripts, unreadable))
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpile::ScriptTranspiler;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_scripts_skips_excluded_dirs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("a.csh"), "echo a\n").unwrap();
        fs::write(dir.path().join("sub/b.CSH"), "echo b\n").unwrap();
        fs::write(dir.path().join("target/c.csh"), "echo c\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x\n").unwrap();

        let scripts = find_scripts(dir.path()).unwrap();
        let names: Vec<_> = scripts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csh", "b.CSH"]);
    }

    #[test]
    fn test_find_scripts_rejects_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.csh");
        fs::write(&file, "echo\n").unwrap();
        let err = find_scripts(&file).unwrap_err();
        assert!(matches!(err, ConvertError::NotADirectory { .. }));
    }

    #[test]
    fn test_convert_tree_writes_outputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.csh"), "setenv A 1\n").unwrap();
        fs::write(dir.path().join("two.csh"), "endif\n").unwrap();

        let summary = convert_tree(dir.path(), &ScriptTranspiler::new()).unwrap();
        assert!(summary.is_success());
        assert_eq!(summary.total(), 2);
        let one = fs::read_to_string(dir.path().join("one.sh")).unwrap();
        assert_eq!(one, "#!/bin/bash\nexport A=1\n");
    }

    #[test]
    fn test_root_inside_excluded_name_still_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("x.csh"), "echo\n").unwrap();
        assert_eq!(find_scripts(&root).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_does_not_stop_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csh"), "echo a\n").unwrap();
        fs::write(dir.path().join("z.csh"), "echo z\n").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("m_link")).unwrap();

        let summary = convert_tree(dir.path(), &ScriptTranspiler::new()).unwrap();
        assert_eq!(summary.converted.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("m_link"));
        assert!(matches!(summary.failed[0].1, ConvertError::Io { .. }));
        assert!(dir.path().join("z.sh").exists());

        assert_eq!(find_scripts(dir.path()).unwrap().len(), 2);
    }
}
