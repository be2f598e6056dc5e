//! Error types for Doxyfile parsing
//!
//! Every lexical and grammar error carries the 1-based physical line it was
//! detected on; the top-level [`DoxyfileError`] attaches the path of the file
//! being parsed, so rendered diagnostics read `path: message (line N)`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Lexical analysis errors
#[derive(Debug, Error)]
pub enum LexError {
    /// Quoted value not closed before the end of the physical line
    #[error("unterminated quoted string (line {line})")]
    UnterminatedString { line: usize },

    /// Input where a variable name was expected did not match `[@A-Z_]+`
    #[error("unexpected character '{character}' (line {line})")]
    UnexpectedCharacter { character: char, line: usize },
}

impl LexError {
    /// The physical line the error was detected on
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedString { line } => *line,
            LexError::UnexpectedCharacter { line, .. } => *line,
        }
    }
}

/// Grammar, directive and include-resolution errors
#[derive(Debug, Error)]
pub enum ParseError {
    /// Lexical error surfaced while pulling tokens
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Variable name not followed by `=` or `+=`
    #[error("missing operator after '{variable}' (line {line})")]
    MissingOperator { variable: String, line: usize },

    /// Assignment with no value tokens
    #[error("missing value in assignment to '{variable}' (line {line})")]
    MissingValue { variable: String, line: usize },

    /// Meta-directive other than `@INCLUDE` / `@INCLUDE_PATH`
    #[error("unknown meta command '{directive}' (line {line})")]
    UnknownDirective { directive: String, line: usize },

    /// `@INCLUDE` target not present in any candidate directory
    #[error("@INCLUDE file '{file}' not found (line {line})")]
    IncludeNotFound { file: String, line: usize },

    /// `@INCLUDE` requires exactly one value
    #[error("@INCLUDE expects exactly one file argument, got {count} (line {line})")]
    IncludeArity { count: usize, line: usize },

    /// A file directly or transitively includes itself
    #[error("include cycle: '{}' is already being parsed (line {})", .path.display(), .line)]
    IncludeCycle { path: PathBuf, line: usize },
}

/// Top-level error type returned by the parsing entry points
#[derive(Debug, Error)]
pub enum DoxyfileError {
    /// Lexical or grammar error in a configuration file
    #[error("{}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// I/O failure opening or reading a configuration file
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DoxyfileError {
    /// The file the error originated in
    pub fn path(&self) -> &std::path::Path {
        match self {
            DoxyfileError::Parse { path, .. } => path,
            DoxyfileError::Io { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parse_error_display_includes_path_and_line() {
        let err = DoxyfileError::Parse {
            path: PathBuf::from("conf/Doxyfile"),
            source: ParseError::MissingOperator {
                variable: "INPUT".to_string(),
                line: 12,
            },
        };
        let message = err.to_string();
        assert!(message.contains("conf/Doxyfile"));
        assert!(message.contains("INPUT"));
        assert!(message.contains("line 12"));
        assert_eq!(err.path(), Path::new("conf/Doxyfile"));
    }

    #[test]
    fn lex_error_propagates_through_parse_error() {
        let err = ParseError::from(LexError::UnterminatedString { line: 3 });
        assert_eq!(err.to_string(), "unterminated quoted string (line 3)");
    }

    #[test]
    fn lex_error_reports_line() {
        assert_eq!(LexError::UnterminatedString { line: 7 }.line(), 7);
        let err = LexError::UnexpectedCharacter {
            character: '%',
            line: 2,
        };
        assert_eq!(err.line(), 2);
    }
}
