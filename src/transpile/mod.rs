//! C-shell to Bash script transpiler
//!
//! Line-oriented and heuristic: each input line is dedented, has its
//! backtick substitutions modernised, is rewritten by the first matching
//! rule, and is re-indented. The only state carried across lines is whether
//! a synthesized label function is open.
//!
//! ```
//! use csh2sh::transpile::ScriptTranspiler;
//!
//! let out = ScriptTranspiler::new().transpile_str("#!/bin/csh\nsetenv VAR valor\n");
//! assert_eq!(out, "#!/bin/bash\nexport VAR=valor\n");
//! ```

pub mod backtick;
pub mod block;
pub mod condition;
pub mod indent;
pub mod rules;

use crate::error::ConvertError;
use crate::registry::Converter;
use block::FunctionBlockTracker;
use rules::RuleEngine;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension of accepted input scripts
pub const SOURCE_EXTENSION: &str = "csh";

/// Extension of generated scripts
pub const TARGET_EXTENSION: &str = "sh";

/// Interpreter header written as the first output line
pub const DEFAULT_HEADER: &str = "#!/bin/bash";

/// State that lives for exactly one conversion
#[derive(Debug, Default)]
pub struct ConversionState {
    pub blocks: FunctionBlockTracker,
}

impl ConversionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function_block_open(&self) -> bool {
        self.blocks.is_open()
    }
}

/// Which side of a conversion an I/O error came from
#[derive(Debug)]
enum StreamError {
    Read(io::Error),
    Write(io::Error),
}

impl StreamError {
    fn into_io(self) -> io::Error {
        match self {
            StreamError::Read(e) | StreamError::Write(e) => e,
        }
    }

    fn into_convert_error(self, input: &Path, output: &Path) -> ConvertError {
        match self {
            StreamError::Read(e) => ConvertError::io(input, e),
            StreamError::Write(e) => ConvertError::io(output, e),
        }
    }
}

/// Converts C-shell scripts into Bash scripts
///
/// A transpiler holds only configuration; every call builds its own
/// [`ConversionState`], so one value can be shared freely.
#[derive(Debug, Clone)]
pub struct ScriptTranspiler {
    header: String,
    engine: RuleEngine,
}

impl Default for ScriptTranspiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptTranspiler {
    pub fn new() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            engine: RuleEngine::new(),
        }
    }

    /// Use a different interpreter header for output line 1
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Path of the script `input` converts to: same directory and base
    /// name, target extension
    pub fn output_path(input: &Path) -> PathBuf {
        input.with_extension(TARGET_EXTENSION)
    }

    /// Convert `input` (a `.csh` file) to a sibling `.sh` file
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the file name does not end in `.csh`
    /// - `NotFound` if the file does not exist
    /// - `Io` if reading or writing fails; the output may be partially written
    pub fn convert_file(&self, input: &Path) -> Result<PathBuf, ConvertError> {
        if !has_source_extension(input) {
            return Err(ConvertError::InvalidInput {
                path: input.to_path_buf(),
                expected: SOURCE_EXTENSION,
            });
        }
        if !input.exists() {
            return Err(ConvertError::NotFound {
                path: input.to_path_buf(),
            });
        }

        let output = Self::output_path(input);
        let reader = File::open(input)
            .map(BufReader::new)
            .map_err(|e| ConvertError::io(input, e))?;
        let writer = File::create(&output)
            .map(BufWriter::new)
            .map_err(|e| ConvertError::io(&output, e))?;

        self.run(reader, writer)
            .map_err(|e| e.into_convert_error(input, &output))?;
        Ok(output)
    }

    /// Transpile a whole script from `reader` to `writer`
    pub fn transpile<R: BufRead, W: Write>(&self, reader: R, writer: W) -> io::Result<()> {
        self.run(reader, writer).map_err(StreamError::into_io)
    }

    fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<(), StreamError> {
        let mut state = ConversionState::new();

        writeln!(writer, "{}", self.header).map_err(StreamError::Write)?;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(StreamError::Read)?.replace('\r', "");

            if index == 0 && line.trim().starts_with("#!") {
                continue;
            }

            if line.trim().is_empty() {
                writeln!(writer).map_err(StreamError::Write)?;
                continue;
            }

            for out in self.convert_line(&line, &mut state) {
                writeln!(writer, "{}", out).map_err(StreamError::Write)?;
            }
        }

        if let Some(close) = state.blocks.finish() {
            writeln!(writer, "{}", close).map_err(StreamError::Write)?;
        }

        writer.flush().map_err(StreamError::Write)
    }

    /// Transpile script text held in memory
    pub fn transpile_str(&self, source: &str) -> String {
        let mut out = Vec::new();
        // Reading from a slice and writing to a Vec cannot fail
        if self.transpile(source.as_bytes(), &mut out).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Convert one non-blank line into zero or more output lines
    pub fn convert_line(&self, line: &str, state: &mut ConversionState) -> Vec<String> {
        let (indent, text) = indent::split_indent(line);
        let text = backtick::migrate_backticks(text);
        let result = self.engine.apply(&text, state);
        if result.is_empty() {
            return Vec::new();
        }
        indent::reindent(indent, &result)
    }
}

impl Converter for ScriptTranspiler {
    fn name(&self) -> &'static str {
        "csh2sh"
    }

    fn convert(&self, input: &Path) -> Result<PathBuf, ConvertError> {
        self.convert_file(input)
    }
}

/// True if the file name ends in `.csh` (any case)
pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> String {
        ScriptTranspiler::new().transpile_str(source)
    }

    #[test]
    fn test_header_written_first() {
        assert_eq!(run("echo hi\n"), "#!/bin/bash\necho hi\n");
    }

    #[test]
    fn test_source_header_dropped() {
        assert_eq!(run("#!/bin/csh -f\necho hi\n"), "#!/bin/bash\necho hi\n");
    }

    #[test]
    fn test_blank_lines_preserved() {
        assert_eq!(run("echo a\n\n   \necho b\n"), "#!/bin/bash\necho a\n\n\necho b\n");
    }

    #[test]
    fn test_later_shebang_suppressed_by_rule() {
        // A blank first line means line 2 is not the source header, but the
        // shebang rule still drops it
        let out = run("\n#!/bin/csh\necho hi\n");
        assert_eq!(out, "#!/bin/bash\n\necho hi\n");
    }

    #[test]
    fn test_indentation_preserved() {
        let src = "if ($a == b) then\n    setenv X 1\nendif\n";
        assert_eq!(
            run(src),
            "#!/bin/bash\nif [ \"$a\" = \"b\" ]; then\n    export X=1\nfi\n"
        );
    }

    #[test]
    fn test_goto_expands_with_indent() {
        let out = run("  goto done_label\n");
        assert_eq!(out, "#!/bin/bash\n  done_label\n  return\n");
    }

    #[test]
    fn test_open_block_closed_at_end() {
        let out = run("start:\n  echo in\n");
        assert_eq!(out, "#!/bin/bash\nstart() {\n  echo in\n}\n");
    }

    #[test]
    fn test_second_label_closes_first() {
        let out = run("a:\necho 1\nb:\necho 2\n");
        assert_eq!(out, "#!/bin/bash\na() {\necho 1\n}\n\nb() {\necho 2\n}\n");
    }

    #[test]
    fn test_indented_labels_keep_indent_on_every_line() {
        let out = run("  a:\n  echo 1\n  b:\n  echo 2\n");
        assert_eq!(
            out,
            "#!/bin/bash\n  a() {\n  echo 1\n  }\n  \n  b() {\n  echo 2\n}\n"
        );
    }

    #[test]
    fn test_no_closing_brace_without_label() {
        let out = run("echo 1\n");
        assert!(!out.contains('}'));
    }

    #[test]
    fn test_carriage_returns_removed() {
        assert_eq!(run("endif\r\n"), "#!/bin/bash\nfi\n");
    }

    #[test]
    fn test_backticks_migrated_before_rules() {
        assert_eq!(run("set d = `date`\n"), "#!/bin/bash\nd=$(date)\n");
    }

    #[test]
    fn test_custom_header() {
        let out = ScriptTranspiler::new().with_header("#!/bin/sh").transpile_str("echo\n");
        assert_eq!(out, "#!/bin/sh\necho\n");
    }

    #[test]
    fn test_state_does_not_leak_between_calls() {
        let transpiler = ScriptTranspiler::new();
        let first = transpiler.transpile_str("lbl:\necho\n");
        assert!(first.ends_with("}\n"));
        let second = transpiler.transpile_str("echo\n");
        assert_eq!(second, "#!/bin/bash\necho\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(run(""), "#!/bin/bash\n");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            ScriptTranspiler::output_path(Path::new("/x/y/build.csh")),
            PathBuf::from("/x/y/build.sh")
        );
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenSource;

    impl io::Read for BrokenSource {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_write_failure_names_output() {
        let err = ScriptTranspiler::new()
            .run("echo\n".as_bytes(), FullDisk)
            .unwrap_err()
            .into_convert_error(Path::new("in.csh"), Path::new("in.sh"));
        assert_eq!(err.path(), Some(Path::new("in.sh")));
    }

    #[test]
    fn test_read_failure_names_input() {
        let err = ScriptTranspiler::new()
            .run(BufReader::new(BrokenSource), Vec::new())
            .unwrap_err()
            .into_convert_error(Path::new("in.csh"), Path::new("in.sh"));
        assert_eq!(err.path(), Some(Path::new("in.csh")));
    }

    #[test]
    fn test_has_source_extension() {
        assert!(has_source_extension(Path::new("a.csh")));
        assert!(has_source_extension(Path::new("A.CSH")));
        assert!(!has_source_extension(Path::new("a.sh")));
        assert!(!has_source_extension(Path::new("csh")));
    }
}
