//! # Doxyfile Lexer
//!
//! A lexer and recursive-descent parser for Doxygen-style configuration
//! files, with `@INCLUDE` resolution, `$(NAME)` environment substitution
//! and serde integration.
//!
//! ## Overview
//!
//! Doxyfiles are line-oriented `KEY = value...` configuration files with a
//! shell-like surface: `#` comments, `\` continuation lines, quoted values
//! with backslash escapes, `+=` accumulation, and meta-directives
//! (`@INCLUDE`, `@INCLUDE_PATH`) that splice other files into the parse.
//! This crate parses one top-level file (and everything it includes) into
//! an ordered configuration map, then normalizes it: empty keys are
//! pruned and singleton lists collapse to scalars, except for the fixed
//! set of keys that downstream consumers iterate positionally
//! ([`ALWAYS_LIST_KEYS`]).
//!
//! ## Basic Usage
//!
//! ```rust
//! use doxyfile_lexer::{Environment, parse_str};
//!
//! let source = r#"
//! ## Example Doxyfile fragment
//! PROJECT_NAME   = "My Project"
//! GENERATE_HTML  = YES
//! INPUT          = src \
//!                  include
//! INPUT         += doc
//! "#;
//!
//! let config = parse_str(source, &Environment::new())?;
//! assert_eq!(config["PROJECT_NAME"], "My Project");
//! assert_eq!(config["GENERATE_HTML"], "YES");
//! let input: Vec<&str> = config["INPUT"].values().collect();
//! assert_eq!(input, ["src", "include", "doc"]);
//! # Ok::<(), doxyfile_lexer::DoxyfileError>(())
//! ```
//!
//! ## Environment Substitution
//!
//! Every `$(NAME)` reference in a value expands against a caller-supplied
//! [`Environment`] — not the process environment — in a single pass, with
//! unresolved names expanding to the empty string:
//!
//! ```rust
//! use doxyfile_lexer::{Environment, parse_str};
//!
//! let env: Environment = [("TOPDIR", "/src/project")].into_iter().collect();
//! let config = parse_str("OUTPUT_DIRECTORY = $(TOPDIR)/doc\n", &env)?;
//! assert_eq!(config["OUTPUT_DIRECTORY"], "/src/project/doc");
//! # Ok::<(), doxyfile_lexer::DoxyfileError>(())
//! ```
//!
//! ## Parsing Files with Includes
//!
//! ```rust,no_run
//! use doxyfile_lexer::{Environment, parse_file_with_search_path};
//!
//! let config = parse_file_with_search_path(
//!     "doc/Doxyfile",
//!     &Environment::new(),
//!     vec!["conf/common".into()],
//! )?;
//! // The resolved path of every included file is recorded, in order.
//! if let Some(included) = config.get("@INCLUDE") {
//!     for path in included.values() {
//!         println!("included {path}");
//!     }
//! }
//! # Ok::<(), doxyfile_lexer::DoxyfileError>(())
//! ```
//!
//! ## Serde Integration
//!
//! The normalized [`Config`] serializes directly; scalars become strings
//! and lists become arrays, preserving key order:
//!
//! ```rust
//! use doxyfile_lexer::{Environment, parse_str};
//!
//! let config = parse_str("GENERATE_HTML = YES\nINPUT = src doc\n", &Environment::new())?;
//! let json = serde_json::to_string(&config).unwrap();
//! assert_eq!(json, r#"{"GENERATE_HTML":"YES","INPUT":["src","doc"]}"#);
//! # Ok::<(), doxyfile_lexer::DoxyfileError>(())
//! ```
//!
//! ## Error Handling
//!
//! Errors are strict and carry the file path and line number. A failed
//! statement aborts the entire top-level parse; callers that prefer the
//! historical forgiving behavior ("no configuration available, use
//! defaults") map the `Err` themselves:
//!
//! ```rust
//! use doxyfile_lexer::{Config, Environment, parse_str};
//!
//! let config = parse_str("@FROBNICATE = x\n", &Environment::new())
//!     .unwrap_or_else(|err| {
//!         eprintln!("warning: {err}");
//!         Config::default()
//!     });
//! assert!(config.is_empty());
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export the public surface
pub use config::{ALWAYS_LIST_KEYS, Config, ConfigMap, ConfigValue, ValueList, is_always_list};
pub use env::{Environment, expand};
pub use error::{DoxyfileError, LexError, ParseError};
pub use lexer::{Lexer, Operator, Values};
pub use parser::{IncludeContext, Parser, parse_file, parse_file_with_search_path, parse_str};
