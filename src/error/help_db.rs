//! Help text database for conversion errors
//!
//! Each error code produced by [`ConvertError`](super::ConvertError) can be
//! looked up here to get guidance on how to fix the problem.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Help text entry for an error
#[derive(Debug, Clone)]
pub struct HelpEntry {
    /// Short title of the problem
    pub title: &'static str,
    /// Detailed explanation of the error
    pub explanation: &'static str,
    /// How to fix the issue
    pub fix: &'static str,
    /// Example showing the error and solution
    pub example: &'static str,
}

/// Get help text for an error code
pub fn get_help(error_code: &str) -> Option<&'static HelpEntry> {
    HELP_DATABASE.get(error_code).copied()
}

static HELP_DATABASE: LazyLock<HashMap<&'static str, &'static HelpEntry>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();

        // Input errors
        map.insert("INVALID_INPUT", &HELP_INVALID_INPUT);
        map.insert("FILE_NOT_FOUND", &HELP_FILE_NOT_FOUND);
        map.insert("NOT_A_DIRECTORY", &HELP_NOT_A_DIRECTORY);

        // I/O errors
        map.insert("IO_FAILURE", &HELP_IO_FAILURE);

        // Registry errors
        map.insert("NO_CONVERTER", &HELP_NO_CONVERTER);
        map.insert("UNSUPPORTED_TARGET", &HELP_UNSUPPORTED_TARGET);

        map
    });

const HELP_INVALID_INPUT: HelpEntry = HelpEntry {
    title: "Input file has the wrong extension",
    explanation: "The converter only accepts C-shell scripts, which are recognised by \
        their .csh extension. Any other file name is rejected before it is opened.",
    fix: "1. Check that you passed the script and not its output\n\
        2. Rename the script so it ends in .csh",
    example: "$ csh2sh notes.txt\n\
        Expected a .csh file: notes.txt\n\n\
        FIX: Rename the script:\n\
        $ mv build build.csh && csh2sh build.csh",
};

const HELP_FILE_NOT_FOUND: HelpEntry = HelpEntry {
    title: "File or directory not found",
    explanation: "The script you asked to convert doesn't exist at the specified path.",
    fix: "1. Check the file path for typos\n\
        2. Verify the file actually exists with 'ls'\n\
        3. Use an absolute path if the script lives in a different directory",
    example: "$ csh2sh setup.csh\n\
        Input file does not exist: setup.csh\n\n\
        FIX: Check if the file exists:\n\
        $ ls scripts/setup.csh",
};

const HELP_NOT_A_DIRECTORY: HelpEntry = HelpEntry {
    title: "Expected a directory but found a file",
    explanation: "Recursive conversion walks a directory tree. The path you passed is \
        not a directory.",
    fix: "1. Drop --recursive to convert a single script\n\
        2. Pass the directory containing the scripts instead",
    example: "$ csh2sh --recursive setup.csh\n\
        Not a valid directory: setup.csh\n\n\
        FIX: Convert the directory:\n\
        $ csh2sh --recursive scripts/",
};

const HELP_IO_FAILURE: HelpEntry = HelpEntry {
    title: "Read or write failed during conversion",
    explanation: "The script could not be read, or the converted .sh file could not be \
        written. The output file may be left partially written.",
    fix: "1. Make sure the script is valid UTF-8 text\n\
        2. Check write permissions on the script's directory\n\
        3. Check the disk is not full",
    example: "$ csh2sh /readonly/setup.csh\n\
        I/O error while converting /readonly/setup.csh: Permission denied\n\n\
        FIX: Copy the script somewhere writable:\n\
        $ cp /readonly/setup.csh /tmp && csh2sh /tmp/setup.csh",
};

const HELP_NO_CONVERTER: HelpEntry = HelpEntry {
    title: "No converter registered for this file type",
    explanation: "Converters are selected by the input file's extension. No converter \
        accepts files with this extension.",
    fix: "1. Check the extension of the input file\n\
        2. Only .csh scripts can be converted to sh",
    example: "$ csh2sh -t sh report.pdf\n\
        No available converters for report.pdf",
};

const HELP_UNSUPPORTED_TARGET: HelpEntry = HelpEntry {
    title: "Conversion target not supported",
    explanation: "A converter exists for the input extension, but not for the requested \
        target kind.",
    fix: "1. Use -t sh for C-shell scripts\n\
        2. Target kinds are case-insensitive",
    example: "$ csh2sh -t zsh setup.csh\n\
        No conversion from csh to zsh\n\n\
        FIX:\n\
        $ csh2sh -t sh setup.csh",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_help_invalid_input() {
        let help = get_help("INVALID_INPUT");
        assert!(help.is_some());
        let entry = help.unwrap();
        assert!(entry.explanation.contains(".csh"));
    }

    #[test]
    fn test_get_help_file_not_found() {
        let entry = get_help("FILE_NOT_FOUND").unwrap();
        assert_eq!(entry.title, "File or directory not found");
        assert!(entry.fix.contains("typos"));
    }

    #[test]
    fn test_get_help_nonexistent() {
        assert!(get_help("NONEXISTENT_ERROR").is_none());
    }

    #[test]
    fn test_help_entries_have_content() {
        for (code, entry) in HELP_DATABASE.iter() {
            assert!(!entry.title.is_empty(), "{} has empty title", code);
            assert!(!entry.explanation.is_empty(), "{} has empty explanation", code);
            assert!(!entry.fix.is_empty(), "{} has empty fix", code);
            assert!(!entry.example.is_empty(), "{} has empty example", code);
        }
    }
}
