use std::path::PathBuf;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while configuring a conversion or doing its I/O.
///
/// The conversion pipeline itself never fails; these come from building the
/// converter (style and highlighter sources) and from reading/writing files.
#[derive(Debug, Error)]
pub enum Md2HtmlError {
    /// IO error while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Input markdown file does not exist.
    #[error("File was not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Output directory does not exist.
    #[error("Output directory was not found: {}", .0.display())]
    OutputDirNotFound(PathBuf),
    /// Output file exists and overwriting was not requested.
    #[error("Output file already exists: {}. Use the --overwrite option to replace it.", .0.display())]
    OutputExists(PathBuf),
    /// Style file does not exist.
    #[error("Specified style file was not found: {}", .0.display())]
    StyleNotFound(PathBuf),
    /// Style URL could not be parsed.
    #[error("Invalid style URL '{url}': {reason}")]
    InvalidStyleUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        reason: String,
    },
    /// Syntax highlighter file does not exist.
    #[error("Specified syntax highlighter file was not found: {}", .0.display())]
    HighlighterNotFound(PathBuf),
    /// Wildcard pattern is malformed.
    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Parser message
        reason: String,
    },
    /// Wildcard pattern matched nothing.
    #[error("No files found matching '{0}'")]
    NoMatchingFiles(String),
    /// Configuration file could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// markdown-rs reported a message while parsing.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_location() {
        let err = Md2HtmlError::Parse {
            message: "unexpected end".into(),
            location: SourceLocation::new(3, 7),
        };
        assert_eq!(err.to_string(), "Parse error at 3:7: unexpected end");
    }

    #[test]
    fn output_exists_mentions_overwrite_flag() {
        let err = Md2HtmlError::OutputExists(PathBuf::from("out/readme.html"));
        let message = err.to_string();
        assert!(message.contains("out/readme.html"));
        assert!(message.contains("--overwrite"));
    }
}
